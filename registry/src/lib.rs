pub mod code_registry;

pub use code_registry::CodeRegistry;
