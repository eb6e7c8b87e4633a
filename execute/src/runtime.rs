//! Facade over the whole engine: code registration, top-level entry points,
//! block housekeeping, and the committed-event broadcast. Each mutating
//! entry runs one call tree against the root overlay and commits it
//! atomically, or not at all.

use crate::{
	consts::{BLOCK_TIME_SECONDS, EVENT_CHANNEL_CAPACITY},
	dispatch,
	gas::GasMeter,
	scheduler::{self, CallOutput, ExecEnv},
};
use log::{info, warn};
use primitives::*;
use registry::CodeRegistry;
use runtime_config::RuntimeConfig;
use state::{InMemoryBackend, StateBackend, StateStore};
use std::{cell::RefCell, rc::Rc, sync::Arc};
use system::{
	account::Account,
	actor::ActorInstance,
	context::BlockInfo,
	errors::EngineError,
	event::EventBroadcast,
	message::CallRequest,
	receipt::CallReceipt,
};
use tokio::sync::broadcast;
use traits::ActorLogic;

pub struct ActorRuntime {
	store: StateStore,
	registry: CodeRegistry,
	config: RuntimeConfig,
	block: BlockInfo,
	transaction_sequence: u64,
	event_tx: broadcast::Sender<EventBroadcast>,
}

impl Default for ActorRuntime {
	fn default() -> ActorRuntime {
		ActorRuntime::new()
	}
}

impl ActorRuntime {
	pub fn new() -> ActorRuntime {
		ActorRuntime::with_config(RuntimeConfig::default())
	}

	pub fn with_config(config: RuntimeConfig) -> ActorRuntime {
		ActorRuntime::with_backend(Box::new(InMemoryBackend::new()), config)
	}

	pub fn with_backend(backend: Box<dyn StateBackend>, config: RuntimeConfig) -> ActorRuntime {
		let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
		ActorRuntime {
			store: StateStore::new(backend),
			registry: CodeRegistry::new(),
			config,
			block: BlockInfo::default(),
			transaction_sequence: 0,
			event_tx,
		}
	}

	pub fn store_code(&mut self, logic: Arc<dyn ActorLogic>) -> CodeId {
		self.registry.store_code(logic)
	}

	/// Committed events of every successful call are broadcast here; events
	/// of discarded branches never appear.
	pub fn subscribe_events(&self) -> broadcast::Receiver<EventBroadcast> {
		self.event_tx.subscribe()
	}

	pub fn block_info(&self) -> BlockInfo {
		self.block
	}

	pub fn advance_block(&mut self) {
		self.block = self.block.next(BLOCK_TIME_SECONDS);
	}

	pub fn instantiate(
		&mut self,
		creator: &Address,
		code_id: CodeId,
		payload: Payload,
		funds: Balance,
	) -> CallReceipt {
		self.run_top_level(*creator, CallRequest::Instantiate { code_id, payload, funds })
	}

	pub fn execute(
		&mut self,
		caller: &Address,
		actor: &Address,
		payload: Payload,
		funds: Balance,
	) -> CallReceipt {
		self.run_top_level(*caller, CallRequest::Execute { actor: *actor, payload, funds })
	}

	pub fn migrate(
		&mut self,
		caller: &Address,
		actor: &Address,
		new_code_id: CodeId,
		payload: Payload,
	) -> CallReceipt {
		self.run_top_level(
			*caller,
			CallRequest::Migrate { actor: *actor, new_code_id, payload },
		)
	}

	pub fn transfer(&mut self, from: &Address, to: &Address, amount: Balance) -> CallReceipt {
		self.run_top_level(*from, CallRequest::Transfer { to: *to, amount })
	}

	/// Privileged entry; not emittable as a sub-call.
	pub fn sudo(&mut self, actor: &Address, payload: Payload) -> CallReceipt {
		let actor = *actor;
		self.run_top_level_with(move |env| scheduler::run_sudo(env, &actor, &payload, 0))
	}

	/// Read-only dispatch against committed state. Never mutates, never
	/// schedules sub-calls; metered with the read-only gas limit.
	pub fn query(&self, target: &Address, payload: &Payload) -> Result<ReturnData, EngineError> {
		let gas = Rc::new(RefCell::new(GasMeter::new(self.config.readonly_call_gas_limit)));
		dispatch::dispatch_query(
			&self.store,
			&self.registry,
			&self.config,
			gas,
			&Address::default(),
			target,
			payload,
			self.block,
			TransactionHash::default(),
			0,
		)
	}

	pub fn balance(&self, address: &Address) -> Result<Balance, EngineError> {
		self.store.balance(address)
	}

	pub fn actor_instance(&self, address: &Address) -> Result<Option<ActorInstance>, EngineError> {
		self.store.get_instance(address)
	}

	/// Committed storage of one actor's partition, for inspection.
	pub fn storage_get(
		&self,
		actor: &Address,
		key: &[u8],
	) -> Result<Option<StorageValue>, EngineError> {
		self.store.storage_get(actor, key)
	}

	/// Genesis-style balance seeding, committed directly.
	pub fn mint(&mut self, to_address: &Address, amount: Balance) -> Result<(), EngineError> {
		let overlay = self.store.open_overlay();
		if let Err(error) = self.store.mint(to_address, amount) {
			self.store.discard(overlay)?;
			return Err(error);
		}
		self.store.commit(overlay)
	}

	fn run_top_level(&mut self, origin: Address, request: CallRequest) -> CallReceipt {
		self.run_top_level_with(move |env| scheduler::run_call(env, &origin, &request, 0))
	}

	fn run_top_level_with<F>(&mut self, run: F) -> CallReceipt
	where
		F: FnOnce(&mut ExecEnv) -> Result<CallOutput, EngineError>,
	{
		let transaction_hash =
			Account::transaction_hash(self.block.block_number, self.transaction_sequence);
		self.transaction_sequence += 1;

		let gas = Rc::new(RefCell::new(GasMeter::new(self.config.call_gas_limit)));
		let result = {
			let mut env = ExecEnv {
				store: &mut self.store,
				registry: &self.registry,
				config: &self.config,
				gas: gas.clone(),
				block: self.block,
				transaction_hash,
			};
			run(&mut env)
		};
		let burnt_gas = gas.borrow().burnt();

		match result {
			Ok(output) => {
				info!(
					"Call committed, transaction: {}, events: {}, burnt_gas: {}",
					hex::encode(transaction_hash),
					output.events.len(),
					burnt_gas
				);
				let receipt = CallReceipt {
					transaction_hash,
					block_number: self.block.block_number,
					success: true,
					data: output.data,
					events: output.events.clone(),
					instantiated: output.instantiated,
					burnt_gas,
					error: None,
				};
				let _ = self.event_tx.send(EventBroadcast {
					transaction_hash,
					block_number: self.block.block_number,
					events: output.events,
				});
				receipt
			},
			Err(error) => {
				warn!(
					"Call aborted, transaction: {}, error: {}",
					hex::encode(transaction_hash),
					error
				);
				// A fatal unwind can leave half-open overlays behind; drop
				// them so the next call starts from committed state.
				self.store.clear_overlays();
				CallReceipt {
					transaction_hash,
					block_number: self.block.block_number,
					success: false,
					data: None,
					events: Vec::new(),
					instantiated: None,
					burnt_gas,
					error: Some(error.to_string()),
				}
			},
		}
	}
}
