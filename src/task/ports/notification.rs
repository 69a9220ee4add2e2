//! Notification port invoked after a task has been persisted.

use crate::task::domain::Task;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Listener told about every newly persisted task.
///
/// Sinks are independent of each other; a failing sink never rolls back the
/// submission or prevents later sinks from running.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Receives a task that has just been stored in `Submitted` state.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionSinkError`] when the notification cannot be
    /// delivered.
    async fn task_submitted(&self, task: &Task) -> Result<(), SubmissionSinkError>;
}

/// Errors returned by submission sinks.
#[derive(Debug, Clone, Error)]
pub enum SubmissionSinkError {
    /// The sink no longer accepts notifications.
    #[error("submission sink is closed")]
    Closed,

    /// Transport-layer failure.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SubmissionSinkError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
