pub mod backend;
pub mod overlay;

pub use backend::{CommitBatch, InMemoryBackend, StateBackend};
pub use overlay::{OverlayId, StateStore};

mod tests;
