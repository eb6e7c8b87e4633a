//! Layered, transactional view of engine state.
//!
//! Overlays are a stack mirroring the depth-first call tree: every frame
//! opens a layer, sub-frames stack on top of it, and a layer leaves the
//! stack exactly once, merged into its parent on commit or dropped without
//! a trace on discard. Account records, actor instance records and emitted
//! events ride in the same layers as key-value state, so one discard rolls
//! all of them back together.

use crate::backend::{CommitBatch, StateBackend};
use log::debug;
use primitives::*;
use std::collections::HashMap;
use system::{account::Account, actor::ActorInstance, errors::EngineError, event::Event};

pub type OverlayId = u64;

#[derive(Debug, Clone, PartialEq)]
enum Delta {
	Set(StorageValue),
	Removed,
}

#[derive(Debug)]
struct OverlayLayer {
	id: OverlayId,
	accounts: HashMap<Address, Account>,
	instances: HashMap<Address, ActorInstance>,
	storage: HashMap<Address, HashMap<StorageKey, Delta>>,
	events: Vec<Event>,
}

impl OverlayLayer {
	fn new(id: OverlayId) -> OverlayLayer {
		OverlayLayer {
			id,
			accounts: HashMap::new(),
			instances: HashMap::new(),
			storage: HashMap::new(),
			events: Vec::new(),
		}
	}

	fn merge_into(self, parent: &mut OverlayLayer) {
		parent.accounts.extend(self.accounts);
		parent.instances.extend(self.instances);
		for (address, deltas) in self.storage {
			parent.storage.entry(address).or_default().extend(deltas);
		}
		parent.events.extend(self.events);
	}

	fn into_batch(self) -> CommitBatch {
		let mut storage = Vec::new();
		for (address, deltas) in self.storage {
			for (key, delta) in deltas {
				let value = match delta {
					Delta::Set(value) => Some(value),
					Delta::Removed => None,
				};
				storage.push((address, key, value));
			}
		}
		CommitBatch {
			accounts: self.accounts.into_values().collect(),
			instances: self.instances.into_values().collect(),
			storage,
			events: self.events,
		}
	}
}

pub struct StateStore {
	backend: Box<dyn StateBackend>,
	layers: Vec<OverlayLayer>,
	next_overlay_id: OverlayId,
}

impl StateStore {
	pub fn new(backend: Box<dyn StateBackend>) -> StateStore {
		StateStore { backend, layers: Vec::new(), next_overlay_id: 1 }
	}

	pub fn backend(&self) -> &dyn StateBackend {
		self.backend.as_ref()
	}

	pub fn overlay_depth(&self) -> usize {
		self.layers.len()
	}

	pub fn open_overlay(&mut self) -> OverlayId {
		let id = self.next_overlay_id;
		self.next_overlay_id += 1;
		self.layers.push(OverlayLayer::new(id));
		id
	}

	/// Merges the overlay into its parent, or into the backend when it is
	/// the root overlay. Commit order must be bottom-up: anything but the
	/// top of the stack is a scheduler bug.
	pub fn commit(&mut self, id: OverlayId) -> Result<(), EngineError> {
		let layer = self.take_top(id, "commit")?;
		match self.layers.last_mut() {
			Some(parent) => layer.merge_into(parent),
			None => {
				debug!("Committing overlay {} to the backend", id);
				self.backend.apply(layer.into_batch())?;
			},
		}
		Ok(())
	}

	/// Drops every change recorded in the overlay.
	pub fn discard(&mut self, id: OverlayId) -> Result<(), EngineError> {
		let layer = self.take_top(id, "discard")?;
		debug!("Discarded overlay {} ({} events dropped)", id, layer.events.len());
		Ok(())
	}

	/// Drops every open overlay. Recovery hatch for a fatal unwind; the
	/// next call starts from committed state.
	pub fn clear_overlays(&mut self) {
		self.layers.clear();
	}

	fn take_top(&mut self, id: OverlayId, operation: &str) -> Result<OverlayLayer, EngineError> {
		match self.layers.pop() {
			Some(top) if top.id == id => Ok(top),
			Some(top) => {
				let error = EngineError::InvalidOverlayState(format!(
					"{} of overlay {}, but the open overlay is {}",
					operation, id, top.id
				));
				self.layers.push(top);
				Err(error)
			},
			None => Err(EngineError::InvalidOverlayState(format!(
				"{} of overlay {}, but no overlay is open",
				operation, id
			))),
		}
	}

	fn top_mut(&mut self, operation: &str) -> Result<&mut OverlayLayer, EngineError> {
		self.layers.last_mut().ok_or_else(|| {
			EngineError::InvalidOverlayState(format!("{} without an open overlay", operation))
		})
	}

	/// Events recorded so far by the given overlay, sub-frame events
	/// included once they committed into it.
	pub fn layer_events(&self, id: OverlayId) -> Result<Vec<Event>, EngineError> {
		match self.layers.last() {
			Some(top) if top.id == id => Ok(top.events.clone()),
			_ => Err(EngineError::InvalidOverlayState(format!(
				"events requested for overlay {} which is not the open overlay",
				id
			))),
		}
	}

	pub fn append_event(&mut self, event: Event) -> Result<(), EngineError> {
		self.top_mut("append_event")?.events.push(event);
		Ok(())
	}

	pub fn get_account(&self, address: &Address) -> Result<Option<Account>, EngineError> {
		for layer in self.layers.iter().rev() {
			if let Some(account) = layer.accounts.get(address) {
				return Ok(Some(account.clone()));
			}
		}
		self.backend.get_account(address)
	}

	pub fn put_account(&mut self, account: &Account) -> Result<(), EngineError> {
		self.top_mut("put_account")?.accounts.insert(account.address, account.clone());
		Ok(())
	}

	pub fn create_account(&mut self, account: &Account) -> Result<(), EngineError> {
		if self.get_account(&account.address)?.is_some() {
			return Err(EngineError::AddressCollision(hex::encode(account.address)));
		}
		self.put_account(account)
	}

	pub fn create_system_account(&mut self, address: &Address) -> Result<(), EngineError> {
		self.create_account(&Account::new_system(*address))
	}

	pub fn get_instance(&self, address: &Address) -> Result<Option<ActorInstance>, EngineError> {
		for layer in self.layers.iter().rev() {
			if let Some(instance) = layer.instances.get(address) {
				return Ok(Some(instance.clone()));
			}
		}
		self.backend.get_instance(address)
	}

	pub fn put_instance(&mut self, instance: &ActorInstance) -> Result<(), EngineError> {
		self.top_mut("put_instance")?
			.instances
			.insert(instance.instance_address, instance.clone());
		Ok(())
	}

	pub fn create_actor_instance(&mut self, instance: &ActorInstance) -> Result<(), EngineError> {
		if self.get_instance(&instance.instance_address)?.is_some() {
			return Err(EngineError::AddressCollision(hex::encode(instance.instance_address)));
		}
		self.put_instance(instance)
	}

	pub fn storage_get(&self, actor: &Address, key: &[u8]) -> Result<Option<StorageValue>, EngineError> {
		for layer in self.layers.iter().rev() {
			if let Some(delta) = layer.storage.get(actor).and_then(|deltas| deltas.get(key)) {
				return match delta {
					Delta::Set(value) => Ok(Some(value.clone())),
					Delta::Removed => Ok(None),
				};
			}
		}
		self.backend.storage_get(actor, key)
	}

	pub fn storage_set(&mut self, actor: &Address, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
		self.top_mut("storage_set")?
			.storage
			.entry(*actor)
			.or_default()
			.insert(key.to_vec(), Delta::Set(value.to_vec()));
		Ok(())
	}

	pub fn storage_remove(&mut self, actor: &Address, key: &[u8]) -> Result<(), EngineError> {
		self.top_mut("storage_remove")?
			.storage
			.entry(*actor)
			.or_default()
			.insert(key.to_vec(), Delta::Removed);
		Ok(())
	}

	pub fn balance(&self, address: &Address) -> Result<Balance, EngineError> {
		Ok(self.get_account(address)?.map(|account| account.balance).unwrap_or(0))
	}

	pub fn get_nonce(&self, address: &Address) -> Result<Nonce, EngineError> {
		Ok(self.get_account(address)?.map(|account| account.nonce).unwrap_or(0))
	}

	pub fn increment_nonce(&mut self, address: &Address) -> Result<(), EngineError> {
		let mut account = self.get_account(address)?.unwrap_or_else(|| Account::new(*address));
		account.nonce = account
			.nonce
			.checked_add(1)
			.ok_or_else(|| EngineError::NonceOverflow(hex::encode(address)))?;
		self.put_account(&account)
	}

	pub fn mint(&mut self, to_address: &Address, amount: Balance) -> Result<(), EngineError> {
		let mut to_account = self.get_account(to_address)?.unwrap_or_else(|| Account::new(*to_address));
		to_account.balance = to_account
			.balance
			.checked_add(amount)
			.ok_or_else(|| EngineError::BalanceOverflow(hex::encode(to_address)))?;
		self.put_account(&to_account)
	}

	pub fn transfer(
		&mut self,
		from_address: &Address,
		to_address: &Address,
		amount: Balance,
	) -> Result<(), EngineError> {
		let mut from_account =
			self.get_account(from_address)?.ok_or_else(|| EngineError::InsufficientBalance {
				account: hex::encode(from_address),
				balance: 0,
				required: amount,
			})?;
		let from_balance = from_account.balance;
		from_account.balance =
			from_balance.checked_sub(amount).ok_or_else(|| EngineError::InsufficientBalance {
				account: hex::encode(from_address),
				balance: from_balance,
				required: amount,
			})?;

		if from_address == to_address {
			return Ok(());
		}

		// Get an account or create a new one
		let mut to_account = self.get_account(to_address)?.unwrap_or_else(|| Account::new(*to_address));
		to_account.balance = to_account
			.balance
			.checked_add(amount)
			.ok_or_else(|| EngineError::BalanceOverflow(hex::encode(to_address)))?;

		self.put_account(&from_account)?;
		self.put_account(&to_account)?;

		Ok(())
	}
}
