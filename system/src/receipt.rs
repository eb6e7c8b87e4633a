use crate::event::Event;
use primitives::*;
use serde::{Deserialize, Serialize};

/// Final outcome of one top-level call. On failure the receipt carries the
/// terminal error that caused the abort and nothing else: no data, no
/// events, no state changes survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReceipt {
	pub transaction_hash: TransactionHash,
	pub block_number: BlockNumber,
	pub success: bool,
	pub data: Option<ReturnData>,
	pub events: Vec<Event>,
	pub instantiated: Option<Address>,
	pub burnt_gas: Gas,
	pub error: Option<String>,
}

impl CallReceipt {
	pub fn is_success(&self) -> bool {
		self.success
	}

	pub fn error_message(&self) -> &str {
		self.error.as_deref().unwrap_or_default()
	}

	/// The spawned actor's address of a successful instantiation.
	pub fn instantiated_address(&self) -> Result<Address, anyhow::Error> {
		self.instantiated
			.ok_or_else(|| anyhow::anyhow!("No actor was instantiated, error: {:?}", self.error))
	}
}
