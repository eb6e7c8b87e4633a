use anyhow::Error;
use primitives::*;
use system::{
	context::CallContext, errors::EngineError, message::MessageKind, reply::ReplyOutcome,
	response::CallResponse,
};

/// Read-only surface handlers call back into. Storage access is scoped to
/// the running actor's own partition; other actors are reachable only
/// through `query`, which dispatches their query handler.
pub trait QueryHost {
	fn storage_get(&self, key: &[u8]) -> Result<Option<StorageValue>, Error>;

	fn balance_of(&self, address: &Address) -> Result<Balance, Error>;

	/// Read-only dispatch against another actor. Depth-bounded like any
	/// call; never carries state mutations.
	fn query(&self, target: &Address, payload: &Payload) -> Result<ReturnData, Error>;
}

/// Mutable surface for Instantiate/Execute/Migrate/Sudo/Reply frames.
pub trait CallHost: QueryHost {
	fn storage_set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Error>;

	fn storage_remove(&mut self, key: &[u8]) -> Result<(), Error>;
}

/// The handlers one code id supplies, one per message kind. Kinds the code
/// does not override fail dispatch with `UnsupportedMessageKind`.
///
/// A returned error is a normal outcome, not a crash: the frame's overlay
/// is discarded and the failure propagates by the caller's reply policy.
pub trait ActorLogic: Send + Sync + std::fmt::Debug {
	fn instantiate(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error>;

	fn execute(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Err(unsupported(MessageKind::Execute))
	}

	fn query(
		&self,
		_host: &dyn QueryHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<ReturnData, Error> {
		Err(unsupported(MessageKind::Query))
	}

	fn reply(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_outcome: &ReplyOutcome,
	) -> Result<CallResponse, Error> {
		Err(unsupported(MessageKind::Reply))
	}

	fn migrate(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Err(unsupported(MessageKind::Migrate))
	}

	fn sudo(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Err(unsupported(MessageKind::Sudo))
	}
}

fn unsupported(kind: MessageKind) -> Error {
	EngineError::UnsupportedMessageKind(kind).into()
}
