use primitives::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
	pub block_number: BlockNumber,
	pub block_hash: BlockHash,
	pub block_timestamp: BlockTimeStamp,
}

impl BlockInfo {
	pub fn new(block_number: BlockNumber, block_timestamp: BlockTimeStamp) -> BlockInfo {
		let mut hasher = Keccak256::new();
		hasher.update(block_number.to_be_bytes());
		let hash = hasher.finalize();

		let mut block_hash = BlockHash::default();
		block_hash.copy_from_slice(&hash);

		BlockInfo { block_number, block_hash, block_timestamp }
	}

	pub fn next(&self, block_time: BlockTimeStamp) -> BlockInfo {
		BlockInfo::new(self.block_number + 1, self.block_timestamp + block_time)
	}
}

impl Default for BlockInfo {
	fn default() -> BlockInfo {
		BlockInfo::new(1, 0)
	}
}

/// Execution context of one call frame, visible to the handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallContext {
	pub caller: Address,
	pub actor_address: Address,
	pub funds: Balance,
	pub block: BlockInfo,
	pub transaction_hash: TransactionHash,
	pub depth: u32,
}
