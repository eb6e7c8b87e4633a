//! Routing from (actor, message kind) to the registered handler. The
//! dispatcher is stateless: it resolves the actor's instance record, looks
//! the code up in the registry, and invokes the matching entry point with a
//! state view appropriate to the kind: mutable for Instantiate / Execute /
//! Migrate / Sudo / Reply, read-only for Query.

use crate::{
	gas::GasMeter,
	host::{ActorCallHost, ActorQueryHost},
};
use primitives::*;
use registry::CodeRegistry;
use runtime_config::RuntimeConfig;
use state::StateStore;
use std::{cell::RefCell, rc::Rc};
use system::{
	context::{BlockInfo, CallContext},
	errors::EngineError,
	message::{Message, MessageKind},
	response::CallResponse,
};

pub fn dispatch_call(
	store: &mut StateStore,
	registry: &CodeRegistry,
	config: &RuntimeConfig,
	gas: Rc<RefCell<GasMeter>>,
	ctx: &CallContext,
	message: &Message,
) -> Result<CallResponse, EngineError> {
	let instance = store
		.get_instance(&ctx.actor_address)?
		.ok_or_else(|| EngineError::NoSuchActor(hex::encode(ctx.actor_address)))?;
	let logic = registry.handler(instance.code_id)?;

	let mut host = ActorCallHost::new(store, registry, config, ctx, gas);
	let result = match message {
		Message::Instantiate { payload } => logic.instantiate(&mut host, ctx, payload),
		Message::Execute { payload } => logic.execute(&mut host, ctx, payload),
		Message::Migrate { payload, .. } => logic.migrate(&mut host, ctx, payload),
		Message::Sudo { payload } => logic.sudo(&mut host, ctx, payload),
		Message::Reply { outcome } => logic.reply(&mut host, ctx, outcome),
		// Queries route through `dispatch_query`; a mutable dispatch of one
		// is a caller bug.
		Message::Query { .. } =>
			Err(EngineError::UnsupportedMessageKind(MessageKind::Query).into()),
	};
	result.map_err(into_engine_error)
}

#[allow(clippy::too_many_arguments)]
pub fn dispatch_query(
	store: &StateStore,
	registry: &CodeRegistry,
	config: &RuntimeConfig,
	gas: Rc<RefCell<GasMeter>>,
	caller: &Address,
	target: &Address,
	payload: &Payload,
	block: BlockInfo,
	transaction_hash: TransactionHash,
	depth: u32,
) -> Result<ReturnData, EngineError> {
	if depth > config.max_call_depth {
		return Err(EngineError::CallDepthExceeded(config.max_call_depth));
	}
	gas.borrow_mut().charge_frame(&config.gas_schedule, payload.len())?;

	let instance = store
		.get_instance(target)?
		.ok_or_else(|| EngineError::NoSuchActor(hex::encode(target)))?;
	let logic = registry.handler(instance.code_id)?;

	let ctx = CallContext {
		caller: *caller,
		actor_address: *target,
		funds: 0,
		block,
		transaction_hash,
		depth,
	};
	let host = ActorQueryHost::new(store, registry, config, &ctx, gas);
	logic.query(&host, &ctx, payload).map_err(into_engine_error)
}

/// Handlers fail with `anyhow::Error`; typed engine errors raised inside
/// host calls pass through unchanged, anything else becomes `Handler`.
pub(crate) fn into_engine_error(error: anyhow::Error) -> EngineError {
	match error.downcast::<EngineError>() {
		Ok(engine_error) => engine_error,
		Err(error) => EngineError::Handler(format!("{:#}", error)),
	}
}
