use primitives::*;
use serde::{Deserialize, Serialize};

/// Record binding an actor address to the code it runs. The record lives in
/// state so it is created, migrated and rolled back under the same overlay
/// rules as any other write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorInstance {
	pub instance_address: Address,
	pub code_id: CodeId,
	pub creator_address: Address,
}
