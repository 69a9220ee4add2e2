//! Service layer for task submission and status lookup.

use crate::task::{
    domain::{Task, TaskId},
    ports::{SubmissionSink, TaskStore, TaskStoreError},
    services::TaskOutput,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for submission and status operations.
#[derive(Debug, Error)]
pub enum TaskSubmissionError {
    /// No task exists for the requested identifier.
    #[error("task not found: {0}")]
    NotFound(String),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for submission service operations.
pub type TaskSubmissionResult<T> = Result<T, TaskSubmissionError>;

/// Creates tasks and reports their status.
///
/// After a task is persisted every registered [`SubmissionSink`] is told
/// about it, in registration order. Sink failures are logged and otherwise
/// ignored: the stored task is never rolled back.
pub struct TaskSubmissionService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    sinks: Vec<Arc<dyn SubmissionSink>>,
}

impl<S, C> TaskSubmissionService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a submission service with no sinks.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            sinks: Vec::new(),
        }
    }

    /// Registers a sink notified after each successful submission.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Persists a new `Submitted` task and notifies the sinks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSubmissionError::Store`] when the task cannot be
    /// persisted. Sinks are not notified in that case.
    pub async fn submit(&self, text: impl Into<String> + Send) -> TaskSubmissionResult<Task> {
        let task = Task::submit(text, &*self.clock);
        let stored = self.store.save(task).await?;
        debug!(task_id = %stored.id(), "task submitted");
        self.notify(&stored).await;
        Ok(stored)
    }

    /// Returns the status projection of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSubmissionError::NotFound`] when the identifier is
    /// malformed or unknown, and [`TaskSubmissionError::Store`] when the
    /// lookup fails.
    pub async fn status(&self, raw_id: &str) -> TaskSubmissionResult<TaskOutput> {
        let not_found = || TaskSubmissionError::NotFound(raw_id.to_owned());
        let task_id: TaskId = raw_id.parse().map_err(|_| not_found())?;
        let task = self.store.get(task_id).await?.ok_or_else(not_found)?;
        Ok(TaskOutput::from(&task))
    }

    async fn notify(&self, task: &Task) {
        for sink in &self.sinks {
            if let Err(err) = sink.task_submitted(task).await {
                warn!(
                    task_id = %task.id(),
                    error = %err,
                    "submission sink failed, task stays submitted"
                );
            }
        }
    }
}
