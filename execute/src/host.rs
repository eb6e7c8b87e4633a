//! The callback surface a running handler sees. One object mediates both
//! the actor's own storage partition and read-only dispatch into other
//! actors, so gas is charged uniformly at this boundary.

use crate::{dispatch, gas::GasMeter};
use anyhow::Error;
use primitives::*;
use registry::CodeRegistry;
use runtime_config::RuntimeConfig;
use state::StateStore;
use std::{cell::RefCell, rc::Rc};
use system::context::CallContext;
use traits::{CallHost, QueryHost};

pub struct ActorCallHost<'a> {
	store: &'a mut StateStore,
	registry: &'a CodeRegistry,
	config: &'a RuntimeConfig,
	ctx: &'a CallContext,
	gas: Rc<RefCell<GasMeter>>,
}

impl<'a> ActorCallHost<'a> {
	pub fn new(
		store: &'a mut StateStore,
		registry: &'a CodeRegistry,
		config: &'a RuntimeConfig,
		ctx: &'a CallContext,
		gas: Rc<RefCell<GasMeter>>,
	) -> ActorCallHost<'a> {
		ActorCallHost { store, registry, config, ctx, gas }
	}
}

impl QueryHost for ActorCallHost<'_> {
	fn storage_get(&self, key: &[u8]) -> Result<Option<StorageValue>, Error> {
		self.gas.borrow_mut().charge_storage_read(&self.config.gas_schedule)?;
		Ok(self.store.storage_get(&self.ctx.actor_address, key)?)
	}

	fn balance_of(&self, address: &Address) -> Result<Balance, Error> {
		self.gas.borrow_mut().charge_storage_read(&self.config.gas_schedule)?;
		Ok(self.store.balance(address)?)
	}

	fn query(&self, target: &Address, payload: &Payload) -> Result<ReturnData, Error> {
		let data = dispatch::dispatch_query(
			&*self.store,
			self.registry,
			self.config,
			self.gas.clone(),
			&self.ctx.actor_address,
			target,
			payload,
			self.ctx.block,
			self.ctx.transaction_hash,
			self.ctx.depth + 1,
		)?;
		Ok(data)
	}
}

impl CallHost for ActorCallHost<'_> {
	fn storage_set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Error> {
		self.gas
			.borrow_mut()
			.charge_storage_write(&self.config.gas_schedule, key.len() + value.len())?;
		Ok(self.store.storage_set(&self.ctx.actor_address, key, value)?)
	}

	fn storage_remove(&mut self, key: &[u8]) -> Result<(), Error> {
		self.gas.borrow_mut().charge_storage_write(&self.config.gas_schedule, key.len())?;
		Ok(self.store.storage_remove(&self.ctx.actor_address, key)?)
	}
}

/// Read-only host for query frames. Queries never receive a mutable view
/// and can only reach other actors through further sub-queries.
pub struct ActorQueryHost<'a> {
	store: &'a StateStore,
	registry: &'a CodeRegistry,
	config: &'a RuntimeConfig,
	ctx: &'a CallContext,
	gas: Rc<RefCell<GasMeter>>,
}

impl<'a> ActorQueryHost<'a> {
	pub fn new(
		store: &'a StateStore,
		registry: &'a CodeRegistry,
		config: &'a RuntimeConfig,
		ctx: &'a CallContext,
		gas: Rc<RefCell<GasMeter>>,
	) -> ActorQueryHost<'a> {
		ActorQueryHost { store, registry, config, ctx, gas }
	}
}

impl QueryHost for ActorQueryHost<'_> {
	fn storage_get(&self, key: &[u8]) -> Result<Option<StorageValue>, Error> {
		self.gas.borrow_mut().charge_storage_read(&self.config.gas_schedule)?;
		Ok(self.store.storage_get(&self.ctx.actor_address, key)?)
	}

	fn balance_of(&self, address: &Address) -> Result<Balance, Error> {
		self.gas.borrow_mut().charge_storage_read(&self.config.gas_schedule)?;
		Ok(self.store.balance(address)?)
	}

	fn query(&self, target: &Address, payload: &Payload) -> Result<ReturnData, Error> {
		let data = dispatch::dispatch_query(
			self.store,
			self.registry,
			self.config,
			self.gas.clone(),
			&self.ctx.actor_address,
			target,
			payload,
			self.ctx.block,
			self.ctx.transaction_hash,
			self.ctx.depth + 1,
		)?;
		Ok(data)
	}
}
