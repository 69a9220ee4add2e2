//! Workers that consume task triggers and drive the processor.
//!
//! A worker pulls deliveries from a [`TriggerSource`] until the source is
//! drained. Every delivery ends in exactly one acknowledgement or rejection:
//! successful and not-applicable deliveries are acknowledged, processing
//! errors are rejected so the source may deliver them again.

use crate::palindrome::PalindromeFinder;
use crate::task::{
    domain::TaskId,
    ports::{Delivery, TaskStore, TriggerError, TriggerResult, TriggerSource},
    services::{ProcessOutcome, TaskProcessor},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Delivery counters reported when a worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Deliveries whose task was found and processed without error.
    pub processed: usize,
    /// Deliveries whose processing failed and were rejected.
    pub failed: usize,
    /// Deliveries with a malformed or unknown task identifier.
    pub skipped: usize,
}

impl WorkerStats {
    /// Returns the total number of deliveries handled.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed
            .saturating_add(self.failed)
            .saturating_add(self.skipped)
    }

    /// Adds the counters from `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            processed: self.processed.saturating_add(other.processed),
            failed: self.failed.saturating_add(other.failed),
            skipped: self.skipped.saturating_add(other.skipped),
        }
    }
}

/// Errors that stop a worker pool.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The trigger source failed.
    #[error(transparent)]
    Trigger(#[from] TriggerError),
    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Consumes deliveries from a trigger source and processes each task.
pub struct TaskWorker<T, S, F, C>
where
    T: TriggerSource,
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    trigger: Arc<T>,
    processor: TaskProcessor<S, F, C>,
}

impl<T, S, F, C> Clone for TaskWorker<T, S, F, C>
where
    T: TriggerSource,
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            trigger: Arc::clone(&self.trigger),
            processor: self.processor.clone(),
        }
    }
}

impl<T, S, F, C> TaskWorker<T, S, F, C>
where
    T: TriggerSource,
    S: TaskStore,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a worker reading from `trigger`.
    #[must_use]
    pub const fn new(trigger: Arc<T>, processor: TaskProcessor<S, F, C>) -> Self {
        Self { trigger, processor }
    }

    /// Handles deliveries until the trigger source is drained.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError`] when receiving, acknowledging or rejecting a
    /// delivery fails.
    pub async fn run(&self) -> TriggerResult<WorkerStats> {
        let mut stats = WorkerStats::default();
        while let Some(delivery) = self.trigger.receive().await? {
            self.handle(&delivery, &mut stats).await?;
        }
        debug!(
            processed = stats.processed,
            failed = stats.failed,
            skipped = stats.skipped,
            "trigger source drained"
        );
        Ok(stats)
    }

    async fn handle(&self, delivery: &Delivery, stats: &mut WorkerStats) -> TriggerResult<()> {
        let Ok(task_id) = delivery.task_id().parse::<TaskId>() else {
            warn!(
                task_id = delivery.task_id(),
                "malformed task identifier, dropping trigger"
            );
            stats.skipped += 1;
            return self.trigger.acknowledge(delivery).await;
        };

        match self.processor.process(task_id).await {
            Ok(ProcessOutcome::NotFound) => {
                stats.skipped += 1;
                self.trigger.acknowledge(delivery).await
            }
            Ok(outcome) => {
                if let ProcessOutcome::Completed(task) = &outcome {
                    info!(%task_id, status = %task.status(), "task completed");
                }
                stats.processed += 1;
                self.trigger.acknowledge(delivery).await
            }
            Err(err) => {
                error!(
                    %task_id,
                    attempt = delivery.attempt(),
                    error = %err,
                    "task processing failed"
                );
                stats.failed += 1;
                self.trigger.reject(delivery).await
            }
        }
    }
}

/// Runs `count` copies of `worker` concurrently and sums their counters.
///
/// A `count` of zero is treated as one.
///
/// # Errors
///
/// Returns [`WorkerError`] when any worker fails or its task cannot be
/// joined. Remaining workers still run to completion first.
pub async fn run_worker_pool<T, S, F, C>(
    worker: TaskWorker<T, S, F, C>,
    count: usize,
) -> Result<WorkerStats, WorkerError>
where
    T: TriggerSource + 'static,
    S: TaskStore + 'static,
    F: PalindromeFinder + 'static,
    C: Clock + Send + Sync + 'static,
{
    let handles: Vec<_> = (0..count.max(1))
        .map(|_| {
            let copy = worker.clone();
            tokio::spawn(async move { copy.run().await })
        })
        .collect();

    let mut totals = WorkerStats::default();
    let mut failure = None;
    for handle in handles {
        let outcome = match handle.await {
            Ok(result) => result.map_err(WorkerError::from),
            Err(err) => Err(WorkerError::from(err)),
        };
        match outcome {
            Ok(stats) => totals = totals.merge(stats),
            Err(err) if failure.is_none() => failure = Some(err),
            Err(err) => error!(error = %err, "additional worker failure"),
        }
    }
    failure.map_or(Ok(totals), Err)
}
