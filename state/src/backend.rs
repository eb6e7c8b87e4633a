//! Permanent storage boundary. The engine never talks to a database
//! directly; it commits a batch into whatever implements [`StateBackend`],
//! so tests run on the in-memory backend and several isolated instances can
//! live in one process.

use anyhow::{anyhow, Error};
use primitives::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use system::{account::Account, actor::ActorInstance, errors::EngineError, event::Event};

/// Everything a committed top-level call writes, in one atomic unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitBatch {
	pub accounts: Vec<Account>,
	pub instances: Vec<ActorInstance>,
	pub storage: Vec<(Address, StorageKey, Option<StorageValue>)>,
	pub events: Vec<Event>,
}

impl CommitBatch {
	pub fn is_empty(&self) -> bool {
		self.accounts.is_empty() &&
			self.instances.is_empty() &&
			self.storage.is_empty() &&
			self.events.is_empty()
	}
}

pub trait StateBackend: Send + Sync {
	fn get_account(&self, address: &Address) -> Result<Option<Account>, EngineError>;

	fn get_instance(&self, address: &Address) -> Result<Option<ActorInstance>, EngineError>;

	fn storage_get(&self, address: &Address, key: &[u8]) -> Result<Option<StorageValue>, EngineError>;

	/// Applies a whole batch. A `None` storage value deletes the key.
	fn apply(&mut self, batch: CommitBatch) -> Result<(), EngineError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InMemoryBackend {
	accounts: HashMap<Address, Account>,
	instances: HashMap<Address, ActorInstance>,
	storage: HashMap<Address, HashMap<StorageKey, StorageValue>>,
	events: Vec<Event>,
}

impl InMemoryBackend {
	pub fn new() -> InMemoryBackend {
		InMemoryBackend::default()
	}

	/// Event log of every committed call, in commit order.
	pub fn committed_events(&self) -> &[Event] {
		&self.events
	}

	pub fn snapshot(&self) -> Result<Vec<u8>, Error> {
		bincode::serialize(self).map_err(|e| anyhow!("Can't serialize backend snapshot: {}", e))
	}

	pub fn restore(bytes: &[u8]) -> Result<InMemoryBackend, Error> {
		bincode::deserialize(bytes).map_err(|e| anyhow!("Can't deserialize backend snapshot: {}", e))
	}
}

impl StateBackend for InMemoryBackend {
	fn get_account(&self, address: &Address) -> Result<Option<Account>, EngineError> {
		Ok(self.accounts.get(address).cloned())
	}

	fn get_instance(&self, address: &Address) -> Result<Option<ActorInstance>, EngineError> {
		Ok(self.instances.get(address).cloned())
	}

	fn storage_get(&self, address: &Address, key: &[u8]) -> Result<Option<StorageValue>, EngineError> {
		Ok(self.storage.get(address).and_then(|partition| partition.get(key)).cloned())
	}

	fn apply(&mut self, batch: CommitBatch) -> Result<(), EngineError> {
		for account in batch.accounts {
			self.accounts.insert(account.address, account);
		}
		for instance in batch.instances {
			self.instances.insert(instance.instance_address, instance);
		}
		for (address, key, value) in batch.storage {
			let partition = self.storage.entry(address).or_default();
			match value {
				Some(value) => {
					partition.insert(key, value);
				},
				None => {
					partition.remove(&key);
				},
			}
		}
		self.events.extend(batch.events);
		Ok(())
	}
}
