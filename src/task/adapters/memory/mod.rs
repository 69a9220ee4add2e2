//! In-memory adapters for tests and local wiring.

mod queue;
mod store;

pub use queue::{DEFAULT_MAX_DELIVERIES, InMemoryTaskQueue};
pub use store::InMemoryTaskStore;
