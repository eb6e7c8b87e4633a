use primitives::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
	pub key: String,
	pub value: String,
}

impl Attribute {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Attribute {
		Attribute { key: key.into(), value: value.into() }
	}
}

/// One emitted event. `emitter` is stamped by the runtime with the address
/// of the frame that produced the event; handlers only choose the kind and
/// the attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub emitter: Address,
	pub kind: String,
	pub attributes: Vec<Attribute>,
}

impl Event {
	pub fn new(kind: impl Into<String>) -> Event {
		Event { emitter: Address::default(), kind: kind.into(), attributes: Vec::new() }
	}

	pub fn add_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Event {
		self.attributes.push(Attribute::new(key, value));
		self
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let attributes = self
			.attributes
			.iter()
			.map(|a| format!("{}={}", a.key, a.value))
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "Event {{emitter: {}, kind: {}, attributes: [{}]}}", hex::encode(self.emitter), self.kind, attributes)
	}
}

/// Broadcast to subscribers once a top-level call commits. Events from
/// discarded branches are never broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBroadcast {
	pub transaction_hash: TransactionHash,
	pub block_number: BlockNumber,
	pub events: Vec<Event>,
}
