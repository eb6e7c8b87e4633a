use anyhow::{anyhow, Error};
use primitives::*;
use serde::Deserialize;

pub const DEFAULT_MAX_CALL_DEPTH: u32 = 15;
pub const DEFAULT_CALL_GAS_LIMIT: Gas = 30_000_000;
pub const READONLY_CALL_DEFAULT_GAS_LIMIT: Gas = 30_000_000;

/// Gas charged per unit of work. These are flat engine-level charges, not a
/// fee market; exhaustion behaves like any other execution failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
	pub call_frame: Gas,
	pub payload_byte: Gas,
	pub storage_read: Gas,
	pub storage_write: Gas,
	pub storage_byte: Gas,
	pub event: Gas,
	pub transfer: Gas,
}

impl Default for GasSchedule {
	fn default() -> GasSchedule {
		GasSchedule {
			call_frame: 1_000,
			payload_byte: 1,
			storage_read: 100,
			storage_write: 200,
			storage_byte: 1,
			event: 50,
			transfer: 500,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
	pub max_call_depth: u32,
	pub call_gas_limit: Gas,
	pub readonly_call_gas_limit: Gas,
	pub gas_schedule: GasSchedule,
}

impl Default for RuntimeConfig {
	fn default() -> RuntimeConfig {
		RuntimeConfig {
			max_call_depth: DEFAULT_MAX_CALL_DEPTH,
			call_gas_limit: DEFAULT_CALL_GAS_LIMIT,
			readonly_call_gas_limit: READONLY_CALL_DEFAULT_GAS_LIMIT,
			gas_schedule: GasSchedule::default(),
		}
	}
}

impl RuntimeConfig {
	pub fn from_toml_str(raw: &str) -> Result<RuntimeConfig, Error> {
		toml::from_str(raw).map_err(|e| anyhow!("Can't parse runtime config: {}", e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = RuntimeConfig::default();
		assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
		assert_eq!(config.call_gas_limit, DEFAULT_CALL_GAS_LIMIT);
		assert_eq!(config.gas_schedule.call_frame, 1_000);
	}

	#[test]
	fn test_from_toml_with_overrides() {
		let config = RuntimeConfig::from_toml_str(
			r#"
			max_call_depth = 4

			[gas_schedule]
			call_frame = 10
			"#,
		)
		.unwrap();

		assert_eq!(config.max_call_depth, 4);
		assert_eq!(config.gas_schedule.call_frame, 10);
		// Unset fields keep their defaults.
		assert_eq!(config.call_gas_limit, DEFAULT_CALL_GAS_LIMIT);
		assert_eq!(config.gas_schedule.storage_read, 100);
	}

	#[test]
	fn test_from_toml_invalid() {
		assert!(RuntimeConfig::from_toml_str("max_call_depth = \"a lot\"").is_err());
	}
}
