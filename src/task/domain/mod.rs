//! Domain model for palindrome task tracking.
//!
//! A [`Task`] is an immutable value. Lifecycle transitions produce a new
//! value rather than mutating a shared instance, so every write through the
//! store carries a fully formed record.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskIdError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use task::{Task, TaskStatus};
