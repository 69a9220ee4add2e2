//! Idempotent processing of a single palindrome task.
//!
//! Triggers arrive at least once, so [`TaskProcessor::process`] may run
//! several times for the same task, including concurrently. Safety comes
//! from re-reading the task immediately before the completing write rather
//! than from any lock: whichever invocation still observes `Started` with no
//! completion time performs the write, and every other invocation drops its
//! result.

use crate::palindrome::{FinderError, PalindromeFinder, PalindromeSolution};
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result of one processing invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// No task exists for the identifier.
    NotFound,
    /// This invocation wrote the completing transition.
    Completed(Task),
    /// The task was completed by another invocation while this one was
    /// searching; the computed result was dropped without a write.
    StaleResultDiscarded,
    /// No transition applies to the observed status.
    Unchanged(TaskStatus),
}

/// Errors that abort a processing invocation.
///
/// None of these are retried here; redelivery is the trigger source's
/// decision.
#[derive(Debug, Error)]
pub enum TaskProcessorError {
    /// Reading or writing the task failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The domain rejected a transition.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The palindrome search failed; the task stays `Started`.
    #[error("palindrome search failed for task {task_id}")]
    Computation {
        /// Task whose search failed.
        task_id: TaskId,
        /// Underlying search failure.
        #[source]
        source: FinderError,
    },
}

/// Result type for task processor operations.
pub type TaskProcessorResult<T> = Result<T, TaskProcessorError>;

/// Drives a task from `Submitted` through `Started` to `Completed`.
pub struct TaskProcessor<S, F, C>
where
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    finder: Arc<F>,
    clock: Arc<C>,
}

impl<S, F, C> Clone for TaskProcessor<S, F, C>
where
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            finder: Arc::clone(&self.finder),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, F, C> TaskProcessor<S, F, C>
where
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new task processor.
    #[must_use]
    pub const fn new(store: Arc<S>, finder: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            store,
            finder,
            clock,
        }
    }

    /// Applies whichever transitions the current task state allows.
    ///
    /// A `Submitted` task is written as `Started` and then carried straight
    /// into the completion path. The store is read at most twice: once up
    /// front and once just before the completing write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProcessorError`] when the store fails, the search
    /// fails, or the domain rejects a transition. Nothing is written after a
    /// failed search.
    pub async fn process(&self, task_id: TaskId) -> TaskProcessorResult<ProcessOutcome> {
        debug!(%task_id, "processing task");
        let Some(fetched) = self.store.get(task_id).await? else {
            warn!(%task_id, "task not found");
            return Ok(ProcessOutcome::NotFound);
        };

        if fetched.status().is_terminal() {
            debug!(%task_id, "task already completed");
            return Ok(ProcessOutcome::Unchanged(fetched.status()));
        }

        let task = if fetched.is_awaiting_start() {
            self.start(&fetched).await?
        } else {
            fetched
        };

        if !task.is_awaiting_completion() {
            debug!(%task_id, status = %task.status(), "no transition applies");
            return Ok(ProcessOutcome::Unchanged(task.status()));
        }
        self.complete(&task).await
    }

    async fn start(&self, task: &Task) -> TaskProcessorResult<Task> {
        let started = task.start(&*self.clock)?;
        debug!(task_id = %task.id(), "starting task");
        Ok(self.store.save(started).await?)
    }

    async fn complete(&self, task: &Task) -> TaskProcessorResult<ProcessOutcome> {
        let task_id = task.id();
        let solution = self.search(task).await?;
        let completed_at = self.clock.utc();

        let Some(current) = self.store.get(task_id).await? else {
            warn!(%task_id, "task disappeared before completion");
            return Ok(ProcessOutcome::NotFound);
        };
        if !current.is_awaiting_completion() {
            info!(
                %task_id,
                status = %current.status(),
                "task already completed elsewhere, discarding stale result"
            );
            return Ok(ProcessOutcome::StaleResultDiscarded);
        }

        let completed = current.complete(completed_at, &solution)?;
        let stored = self.store.save(completed).await?;
        debug!(%task_id, palindrome_length = solution.length(), "task completed");
        Ok(ProcessOutcome::Completed(stored))
    }

    async fn search(&self, task: &Task) -> TaskProcessorResult<PalindromeSolution> {
        debug!(task_id = %task.id(), "searching for longest palindrome");
        let finder = Arc::clone(&self.finder);
        let text = task.text().to_owned();
        let result = tokio::task::spawn_blocking(move || finder.find(&text))
            .await
            .unwrap_or_else(|err| Err(FinderError::new(format!("search aborted: {err}"))));
        result.map_err(|source| TaskProcessorError::Computation {
            task_id: task.id(),
            source,
        })
    }
}
