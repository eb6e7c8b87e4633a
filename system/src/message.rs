use crate::reply::ReplyOutcome;
use primitives::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six entry points an actor can expose. `Query` is the only read-only
/// kind; `Reply` is dispatched by the scheduler itself, never by an external
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
	Instantiate,
	Execute,
	Query,
	Reply,
	Migrate,
	Sudo,
}

impl MessageKind {
	pub fn as_str(&self) -> &'static str {
		match *self {
			MessageKind::Instantiate => "instantiate",
			MessageKind::Execute => "execute",
			MessageKind::Query => "query",
			MessageKind::Reply => "reply",
			MessageKind::Migrate => "migrate",
			MessageKind::Sudo => "sudo",
		}
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A dispatched message. The payload is opaque to the engine and meaningful
/// only to the target actor's handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
	Instantiate { payload: Payload },
	Execute { payload: Payload },
	Query { payload: Payload },
	Reply { outcome: ReplyOutcome },
	Migrate { new_code_id: CodeId, payload: Payload },
	Sudo { payload: Payload },
}

impl Message {
	pub fn kind(&self) -> MessageKind {
		match self {
			Message::Instantiate { .. } => MessageKind::Instantiate,
			Message::Execute { .. } => MessageKind::Execute,
			Message::Query { .. } => MessageKind::Query,
			Message::Reply { .. } => MessageKind::Reply,
			Message::Migrate { .. } => MessageKind::Migrate,
			Message::Sudo { .. } => MessageKind::Sudo,
		}
	}

	pub fn payload_len(&self) -> usize {
		match self {
			Message::Instantiate { payload } |
			Message::Execute { payload } |
			Message::Query { payload } |
			Message::Migrate { payload, .. } |
			Message::Sudo { payload } => payload.len(),
			Message::Reply { .. } => 0,
		}
	}
}

/// What a sub-call asks the scheduler to run.
///
/// `Instantiate` has no target address: the scheduler derives one and
/// reports it back through the reply info. `Transfer` moves native tokens
/// and dispatches no handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallRequest {
	Instantiate { code_id: CodeId, payload: Payload, funds: Balance },
	Execute { actor: Address, payload: Payload, funds: Balance },
	Migrate { actor: Address, new_code_id: CodeId, payload: Payload },
	Transfer { to: Address, amount: Balance },
}

/// When the caller's `reply` handler runs for a finished sub-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyOn {
	Never,
	OnSuccess,
	OnError,
	Always,
}

impl ReplyOn {
	pub fn on_success(&self) -> bool {
		matches!(self, ReplyOn::OnSuccess | ReplyOn::Always)
	}

	pub fn on_error(&self) -> bool {
		matches!(self, ReplyOn::OnError | ReplyOn::Always)
	}
}

/// One scheduled sub-call. The id is caller-assigned and opaque to both the
/// scheduler and the callee; it only comes back in the reply outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCall {
	pub id: ReplyId,
	pub request: CallRequest,
	pub reply_on: ReplyOn,
}

impl SubCall {
	pub fn new(request: CallRequest) -> SubCall {
		SubCall { id: 0, request, reply_on: ReplyOn::Never }
	}

	pub fn reply_on_success(id: ReplyId, request: CallRequest) -> SubCall {
		SubCall { id, request, reply_on: ReplyOn::OnSuccess }
	}

	pub fn reply_on_error(id: ReplyId, request: CallRequest) -> SubCall {
		SubCall { id, request, reply_on: ReplyOn::OnError }
	}

	pub fn reply_always(id: ReplyId, request: CallRequest) -> SubCall {
		SubCall { id, request, reply_on: ReplyOn::Always }
	}
}
