//! Depth-first, strictly sequential execution of a call tree.
//!
//! Every frame runs on its own overlay. A frame commits into its parent
//! only after its handler and every scheduled sub-call (reply frames
//! included) resolved; any failure discards the frame's overlay and
//! propagates by the caller's reply policy. Fatal errors bypass reply
//! interception and unwind the whole tree.

use crate::{dispatch, execute_token::ExecuteToken, gas::GasMeter};
use log::debug;
use primitives::*;
use registry::CodeRegistry;
use runtime_config::RuntimeConfig;
use state::{OverlayId, StateStore};
use std::{cell::RefCell, rc::Rc};
use system::{
	account::Account,
	actor::ActorInstance,
	context::{BlockInfo, CallContext},
	errors::EngineError,
	event::Event,
	message::{CallRequest, Message, MessageKind},
	reply::{ReplyOutcome, SubCallResult, SubCallSuccess},
	response::CallResponse,
};

pub struct ExecEnv<'a> {
	pub store: &'a mut StateStore,
	pub registry: &'a CodeRegistry,
	pub config: &'a RuntimeConfig,
	pub gas: Rc<RefCell<GasMeter>>,
	pub block: BlockInfo,
	pub transaction_hash: TransactionHash,
}

/// What a resolved frame hands back to its caller: the data its subtree
/// delivered (last writer wins), the events its committed subtree emitted,
/// and the spawned address when the frame was an instantiation.
#[derive(Debug, Clone, Default)]
pub struct CallOutput {
	pub data: Option<ReturnData>,
	pub events: Vec<Event>,
	pub instantiated: Option<Address>,
}

pub fn run_call(
	env: &mut ExecEnv,
	caller: &Address,
	request: &CallRequest,
	depth: u32,
) -> Result<CallOutput, EngineError> {
	if depth > env.config.max_call_depth {
		return Err(EngineError::CallDepthExceeded(env.config.max_call_depth));
	}
	let overlay = env.store.open_overlay();
	let result = call_frame(env, caller, request, depth);
	finish_frame(env, overlay, result)
}

/// Runs the sudo entry point against an actor. Reachable only through the
/// runtime facade; handlers cannot emit sudo sub-calls.
pub fn run_sudo(
	env: &mut ExecEnv,
	actor: &Address,
	payload: &Payload,
	depth: u32,
) -> Result<CallOutput, EngineError> {
	if depth > env.config.max_call_depth {
		return Err(EngineError::CallDepthExceeded(env.config.max_call_depth));
	}
	let overlay = env.store.open_overlay();
	let ctx = frame_context(env, actor, actor, 0, depth);
	let message = Message::Sudo { payload: payload.clone() };
	let result = message_frame(env, ctx, &message, None);
	finish_frame(env, overlay, result)
}

fn run_reply(
	env: &mut ExecEnv,
	actor: &Address,
	outcome: ReplyOutcome,
	depth: u32,
) -> Result<CallOutput, EngineError> {
	if depth > env.config.max_call_depth {
		return Err(EngineError::CallDepthExceeded(env.config.max_call_depth));
	}
	let overlay = env.store.open_overlay();
	let ctx = frame_context(env, actor, actor, 0, depth);
	let message = Message::Reply { outcome };
	let result = message_frame(env, ctx, &message, None);
	finish_frame(env, overlay, result)
}

/// Tears the frame's overlay down exactly once: committed into the parent
/// on success, discarded without a trace on failure.
fn finish_frame(
	env: &mut ExecEnv,
	overlay: OverlayId,
	result: Result<CallOutput, EngineError>,
) -> Result<CallOutput, EngineError> {
	match result {
		Ok(mut output) => {
			output.events = env.store.layer_events(overlay)?;
			env.store.commit(overlay)?;
			Ok(output)
		},
		Err(error) => {
			env.store.discard(overlay)?;
			Err(error)
		},
	}
}

fn call_frame(
	env: &mut ExecEnv,
	caller: &Address,
	request: &CallRequest,
	depth: u32,
) -> Result<CallOutput, EngineError> {
	match request {
		CallRequest::Transfer { to, amount } => {
			env.gas.borrow_mut().charge_transfer(&env.config.gas_schedule)?;
			ExecuteToken::execute_native_token_transfer(env.store, caller, to, *amount)?;
			Ok(CallOutput::default())
		},
		CallRequest::Instantiate { code_id, payload, funds } => {
			if !env.registry.contains(*code_id) {
				return Err(EngineError::UnknownCodeId(*code_id));
			}
			let nonce = env.store.get_nonce(caller)?;
			let instance_address = Account::actor_address(caller, *code_id, nonce);
			env.store.increment_nonce(caller)?;
			env.store.create_system_account(&instance_address)?;
			env.store.create_actor_instance(&ActorInstance {
				instance_address,
				code_id: *code_id,
				creator_address: *caller,
			})?;
			debug!(
				"Instantiating actor, code_id: {}, instance_address: {}",
				code_id,
				hex::encode(instance_address)
			);

			transfer_funds(env, caller, &instance_address, *funds)?;
			let ctx = frame_context(env, caller, &instance_address, *funds, depth);
			let message = Message::Instantiate { payload: payload.clone() };
			message_frame(env, ctx, &message, Some(instance_address))
		},
		CallRequest::Execute { actor, payload, funds } => {
			transfer_funds(env, caller, actor, *funds)?;
			let ctx = frame_context(env, caller, actor, *funds, depth);
			let message = Message::Execute { payload: payload.clone() };
			message_frame(env, ctx, &message, None)
		},
		CallRequest::Migrate { actor, new_code_id, payload } => {
			if !env.registry.contains(*new_code_id) {
				return Err(EngineError::UnknownCodeId(*new_code_id));
			}
			let instance = env
				.store
				.get_instance(actor)?
				.ok_or_else(|| EngineError::NoSuchActor(hex::encode(actor)))?;
			// Repoint first: the new code's migrate handler runs.
			env.store.put_instance(&ActorInstance { code_id: *new_code_id, ..instance })?;

			let ctx = frame_context(env, caller, actor, 0, depth);
			let message = Message::Migrate { new_code_id: *new_code_id, payload: payload.clone() };
			message_frame(env, ctx, &message, None)
		},
	}
}

/// Executes one dispatched message and everything it schedules. The
/// frame's overlay is already open; sub-frames open their own on top.
fn message_frame(
	env: &mut ExecEnv,
	ctx: CallContext,
	message: &Message,
	instantiated: Option<Address>,
) -> Result<CallOutput, EngineError> {
	env.gas.borrow_mut().charge_frame(&env.config.gas_schedule, message.payload_len())?;

	let response =
		dispatch::dispatch_call(env.store, env.registry, env.config, env.gas.clone(), &ctx, message)?;
	append_frame_events(env, &ctx, message.kind(), &response)?;

	let mut data = None;
	for sub_call in &response.sub_calls {
		match run_call(env, &ctx.actor_address, &sub_call.request, ctx.depth + 1) {
			Ok(child) => {
				if child.data.is_some() {
					data = child.data.clone();
				}
				if sub_call.reply_on.on_success() {
					let outcome = ReplyOutcome {
						id: sub_call.id,
						result: SubCallResult::Success(SubCallSuccess {
							data: child.data,
							events: child.events,
							instantiated: child.instantiated,
						}),
					};
					let reply_output = run_reply(env, &ctx.actor_address, outcome, ctx.depth + 1)?;
					if reply_output.data.is_some() {
						data = reply_output.data;
					}
				}
			},
			Err(error) => {
				if error.is_fatal() {
					return Err(error);
				}
				if sub_call.reply_on.on_error() {
					let outcome = ReplyOutcome {
						id: sub_call.id,
						result: SubCallResult::Failure { error: error.to_string() },
					};
					let reply_output = run_reply(env, &ctx.actor_address, outcome, ctx.depth + 1)?;
					if reply_output.data.is_some() {
						data = reply_output.data;
					}
				} else {
					return Err(error);
				}
			},
		}
	}

	// The frame completes after its sub-calls, so its own data is the last
	// writer within this subtree.
	if response.data.is_some() {
		data = response.data;
	}

	Ok(CallOutput { data, events: Vec::new(), instantiated })
}

fn frame_context(
	env: &ExecEnv,
	caller: &Address,
	actor: &Address,
	funds: Balance,
	depth: u32,
) -> CallContext {
	CallContext {
		caller: *caller,
		actor_address: *actor,
		funds,
		block: env.block,
		transaction_hash: env.transaction_hash,
		depth,
	}
}

fn transfer_funds(
	env: &mut ExecEnv,
	from: &Address,
	to: &Address,
	funds: Balance,
) -> Result<(), EngineError> {
	if funds == 0 {
		return Ok(());
	}
	env.gas.borrow_mut().charge_transfer(&env.config.gas_schedule)?;
	env.store.transfer(from, to, funds)
}

fn append_frame_events(
	env: &mut ExecEnv,
	ctx: &CallContext,
	kind: MessageKind,
	response: &CallResponse,
) -> Result<(), EngineError> {
	if !response.attributes.is_empty() {
		env.gas.borrow_mut().charge_event(&env.config.gas_schedule)?;
		let event = Event {
			emitter: ctx.actor_address,
			kind: kind.as_str().to_owned(),
			attributes: response.attributes.clone(),
		};
		env.store.append_event(event)?;
	}
	for event in &response.events {
		env.gas.borrow_mut().charge_event(&env.config.gas_schedule)?;
		let mut event = event.clone();
		event.emitter = ctx.actor_address;
		env.store.append_event(event)?;
	}
	Ok(())
}
