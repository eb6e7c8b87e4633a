use log::info;
use primitives::*;
use std::{collections::HashMap, sync::Arc};
use system::errors::EngineError;
use traits::ActorLogic;

/// Registered code, keyed by code id. Dispatch is a pure lookup from
/// (code id, message kind) to a handler; the registry itself never touches
/// state.
pub struct CodeRegistry {
	codes: HashMap<CodeId, Arc<dyn ActorLogic>>,
	next_code_id: CodeId,
}

impl Default for CodeRegistry {
	fn default() -> CodeRegistry {
		CodeRegistry::new()
	}
}

impl CodeRegistry {
	pub fn new() -> CodeRegistry {
		CodeRegistry { codes: HashMap::new(), next_code_id: 1 }
	}

	pub fn store_code(&mut self, logic: Arc<dyn ActorLogic>) -> CodeId {
		let code_id = self.next_code_id;
		self.next_code_id += 1;
		self.codes.insert(code_id, logic);
		info!("Stored code, code_id: {}", code_id);
		code_id
	}

	pub fn handler(&self, code_id: CodeId) -> Result<Arc<dyn ActorLogic>, EngineError> {
		self.codes.get(&code_id).cloned().ok_or(EngineError::UnknownCodeId(code_id))
	}

	pub fn contains(&self, code_id: CodeId) -> bool {
		self.codes.contains_key(&code_id)
	}
}
