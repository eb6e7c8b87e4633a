use crate::{
	event::{Attribute, Event},
	message::SubCall,
};
use primitives::*;
use serde::{Deserialize, Serialize};

/// What a mutating handler returns: sub-calls to schedule (executed in the
/// exact order added), attributes and events to emit, and an optional data
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
	pub sub_calls: Vec<SubCall>,
	pub attributes: Vec<Attribute>,
	pub events: Vec<Event>,
	pub data: Option<ReturnData>,
}

impl CallResponse {
	pub fn new() -> CallResponse {
		CallResponse::default()
	}

	pub fn add_sub_call(mut self, sub_call: SubCall) -> CallResponse {
		self.sub_calls.push(sub_call);
		self
	}

	pub fn add_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> CallResponse {
		self.attributes.push(Attribute::new(key, value));
		self
	}

	pub fn add_event(mut self, event: Event) -> CallResponse {
		self.events.push(event);
		self
	}

	pub fn set_data(mut self, data: impl Into<ReturnData>) -> CallResponse {
		self.data = Some(data.into());
		self
	}
}
