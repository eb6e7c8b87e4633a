use primitives::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
	pub address: Address,
	pub balance: Balance,
	pub nonce: Nonce,
	pub account_type: AccountType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccountType {
	System,
	User,
}

impl AccountType {
	pub fn as_str(&self) -> &'static str {
		match *self {
			AccountType::System => "System",
			AccountType::User => "User",
		}
	}
}

impl Account {
	pub fn new(address: Address) -> Account {
		Account { address, balance: 0, nonce: 0, account_type: AccountType::User }
	}

	pub fn new_system(address: Address) -> Account {
		Account { address, balance: 0, nonce: 0, account_type: AccountType::System }
	}

	/// Deterministic address for an actor spawned by `creator` with its
	/// current nonce. The nonce is consumed by the spawning frame, so two
	/// instantiations from the same creator never collide.
	pub fn actor_address(creator: &Address, code_id: CodeId, nonce: Nonce) -> Address {
		let mut hasher = Keccak256::new();
		hasher.update(creator);
		hasher.update(code_id.to_be_bytes());
		hasher.update(nonce.to_be_bytes());
		let hash = hasher.finalize();

		let mut address = Address::default();
		address.copy_from_slice(&hash[12..32]);
		address
	}

	pub fn transaction_hash(block_number: BlockNumber, sequence: u64) -> TransactionHash {
		let mut hasher = Keccak256::new();
		hasher.update(block_number.to_be_bytes());
		hasher.update(sequence.to_be_bytes());
		let hash = hasher.finalize();

		let mut transaction_hash = TransactionHash::default();
		transaction_hash.copy_from_slice(&hash);
		transaction_hash
	}
}
