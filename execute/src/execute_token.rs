use log::info;
use primitives::*;
use state::StateStore;
use system::{errors::EngineError, event::Event};

pub struct ExecuteToken;

impl ExecuteToken {
	/// Moves native tokens inside the current overlay and records a
	/// `transfer` event alongside, so a later discard rolls back both.
	pub fn execute_native_token_transfer(
		store: &mut StateStore,
		from_address: &Address,
		to_address: &Address,
		amount: Balance,
	) -> Result<(), EngineError> {
		info!(
			"Executing native token transfer, from: {}, to: {}, amount: {}",
			hex::encode(from_address),
			hex::encode(to_address),
			amount
		);
		store.transfer(from_address, to_address, amount)?;

		let mut event = Event::new("transfer")
			.add_attribute("from", hex::encode(from_address))
			.add_attribute("to", hex::encode(to_address))
			.add_attribute("amount", amount.to_string());
		event.emitter = *from_address;
		store.append_event(event)
	}
}
