use crate::message::MessageKind;
use primitives::*;
use serde::Serialize;

/// Engine-level error taxonomy.
///
/// `Handler` wraps whatever failure value an actor's handler returned; it is
/// an expected outcome, not a crash. `InvalidOverlayState` and
/// `CallDepthExceeded` are fatal to the whole call tree and are never
/// intercepted by reply policies.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
pub enum EngineError {
	// routing errors
	#[error("no such actor: {0}")]
	NoSuchActor(String),
	#[error("no {0} handler registered for this actor's code")]
	UnsupportedMessageKind(MessageKind),
	#[error("unknown code id: {0}")]
	UnknownCodeId(CodeId),
	// state errors
	#[error("invalid overlay state: {0}")]
	InvalidOverlayState(String),
	#[error("address collision: {0}")]
	AddressCollision(String),
	// depth errors
	#[error("call depth exceeded: limit={0}")]
	CallDepthExceeded(u32),
	// resource errors
	#[error("out of gas: limit={limit}, burnt={burnt}, requested={requested}")]
	OutOfGas { limit: Gas, burnt: Gas, requested: Gas },
	// balance errors
	#[error("insufficient balance: account={account}, balance={balance}, required={required}")]
	InsufficientBalance { account: String, balance: Balance, required: Balance },
	#[error("balance overflow: account={0}")]
	BalanceOverflow(String),
	#[error("nonce overflow: account={0}")]
	NonceOverflow(String),
	// handler errors
	#[error("handler error: {0}")]
	Handler(String),
}

impl EngineError {
	/// Fatal errors abort the whole call tree; an error-requesting reply
	/// policy must not intercept them.
	pub fn is_fatal(&self) -> bool {
		matches!(self, EngineError::InvalidOverlayState(_) | EngineError::CallDepthExceeded(_))
	}
}
