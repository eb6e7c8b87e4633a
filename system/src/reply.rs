use crate::event::Event;
use primitives::*;
use serde::{Deserialize, Serialize};

/// Success info handed to the caller's `reply` handler: the sub-call's
/// delivered data, the events its committed subtree emitted and, for
/// instantiations, the spawned actor's address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCallSuccess {
	pub data: Option<ReturnData>,
	pub events: Vec<Event>,
	pub instantiated: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubCallResult {
	Success(SubCallSuccess),
	Failure { error: String },
}

impl SubCallResult {
	pub fn is_success(&self) -> bool {
		matches!(self, SubCallResult::Success(_))
	}

	pub fn success(&self) -> Option<&SubCallSuccess> {
		match self {
			SubCallResult::Success(success) => Some(success),
			SubCallResult::Failure { .. } => None,
		}
	}

	pub fn failure(&self) -> Option<&str> {
		match self {
			SubCallResult::Success(_) => None,
			SubCallResult::Failure { error } => Some(error),
		}
	}
}

/// What a `reply` handler receives: the caller-assigned correlation id and
/// the resolved result of the sub-call it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyOutcome {
	pub id: ReplyId,
	pub result: SubCallResult,
}
