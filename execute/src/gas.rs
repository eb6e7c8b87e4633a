use primitives::*;
use runtime_config::GasSchedule;
use system::errors::EngineError;

/// Call-cost budget for one top-level call, shared by every frame in the
/// tree. Exhaustion is an ordinary execution failure: the current frame
/// discards its overlay and the error propagates by reply policy.
#[derive(Debug)]
pub struct GasMeter {
	gas_limit: Gas,
	remaining: Gas,
}

impl GasMeter {
	pub fn new(gas_limit: Gas) -> GasMeter {
		GasMeter { gas_limit, remaining: gas_limit }
	}

	pub fn gas_limit(&self) -> Gas {
		self.gas_limit
	}

	pub fn remaining(&self) -> Gas {
		self.remaining
	}

	pub fn burnt(&self) -> Gas {
		self.gas_limit.saturating_sub(self.remaining)
	}

	pub fn consume_checked(&mut self, amount: Gas) -> Result<(), EngineError> {
		if self.remaining < amount {
			return Err(EngineError::OutOfGas {
				limit: self.gas_limit,
				burnt: self.burnt(),
				requested: amount,
			});
		}
		self.remaining -= amount;
		Ok(())
	}

	pub fn charge_frame(&mut self, schedule: &GasSchedule, payload_len: usize) -> Result<(), EngineError> {
		let payload_gas = schedule.payload_byte.saturating_mul(payload_len as Gas);
		self.consume_checked(schedule.call_frame.saturating_add(payload_gas))
	}

	pub fn charge_storage_read(&mut self, schedule: &GasSchedule) -> Result<(), EngineError> {
		self.consume_checked(schedule.storage_read)
	}

	pub fn charge_storage_write(&mut self, schedule: &GasSchedule, bytes: usize) -> Result<(), EngineError> {
		let byte_gas = schedule.storage_byte.saturating_mul(bytes as Gas);
		self.consume_checked(schedule.storage_write.saturating_add(byte_gas))
	}

	pub fn charge_event(&mut self, schedule: &GasSchedule) -> Result<(), EngineError> {
		self.consume_checked(schedule.event)
	}

	pub fn charge_transfer(&mut self, schedule: &GasSchedule) -> Result<(), EngineError> {
		self.consume_checked(schedule.transfer)
	}
}
