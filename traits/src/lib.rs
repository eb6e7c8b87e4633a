pub mod actor_call;

pub use actor_call::{ActorLogic, CallHost, QueryHost};
