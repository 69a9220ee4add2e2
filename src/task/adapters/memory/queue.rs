//! In-memory at-least-once delivery queue.
//!
//! The queue plays both sides of the trigger boundary: it is a
//! [`SubmissionSink`] that publishes the identifier of each new task, and a
//! [`TriggerSource`] that hands those identifiers to workers. Rejected
//! deliveries are queued again until `max_deliveries` attempts have been
//! made.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::warn;

use crate::task::{
    domain::Task,
    ports::{
        Delivery, SubmissionSink, SubmissionSinkError, TriggerError, TriggerResult, TriggerSource,
    },
};

/// Default number of delivery attempts per identifier.
pub const DEFAULT_MAX_DELIVERIES: u32 = 3;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Delivery>,
    in_flight: usize,
    closed: bool,
}

/// In-memory trigger queue with redelivery of rejected identifiers.
///
/// [`TriggerSource::receive`] returns `None` only after [`close`] has been
/// called, every pending delivery has been handed out, and every delivery in
/// flight has been acknowledged or rejected for the last time.
///
/// [`close`]: InMemoryTaskQueue::close
#[derive(Debug)]
pub struct InMemoryTaskQueue {
    state: Mutex<QueueState>,
    changed: Notify,
    max_deliveries: u32,
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskQueue {
    /// Creates an open queue with [`DEFAULT_MAX_DELIVERIES`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_deliveries(DEFAULT_MAX_DELIVERIES)
    }

    /// Creates an open queue allowing `max_deliveries` attempts per
    /// identifier. A value of zero is treated as one.
    #[must_use]
    pub fn with_max_deliveries(max_deliveries: u32) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            changed: Notify::new(),
            max_deliveries: max_deliveries.max(1),
        }
    }

    /// Returns the number of delivery attempts allowed per identifier.
    #[must_use]
    pub const fn max_deliveries(&self) -> u32 {
        self.max_deliveries
    }

    /// Enqueues a delivery of `task_id`.
    ///
    /// Publishing the same identifier again models duplicate delivery.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionSinkError::Closed`] once the queue is closed.
    pub fn publish(&self, task_id: impl Into<String>) -> Result<(), SubmissionSinkError> {
        {
            let mut state = self.lock().map_err(SubmissionSinkError::transport)?;
            if state.closed {
                return Err(SubmissionSinkError::Closed);
            }
            state.pending.push_back(Delivery::new(task_id));
        }
        self.changed.notify_waiters();
        Ok(())
    }

    /// Stops accepting new publications. Deliveries already queued or in
    /// flight are still handed out and may still be redelivered.
    ///
    /// A poisoned queue cannot record the closure; the failure is logged and
    /// waiting receivers are woken so they observe the poisoned lock.
    pub fn close(&self) {
        match self.lock() {
            Ok(mut state) => state.closed = true,
            Err(err) => warn!(error = %err, "queue lock poisoned, close not recorded"),
        }
        self.changed.notify_waiters();
    }

    /// Returns the number of deliveries waiting to be received.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Transport`] when the queue lock is poisoned.
    pub fn pending(&self) -> TriggerResult<usize> {
        let state = self.lock().map_err(TriggerError::transport)?;
        Ok(state.pending.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, QueueState>, std::io::Error> {
        self.state
            .lock()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn settle(&self, delivery: &Delivery, redeliver: bool) -> TriggerResult<()> {
        {
            let mut state = self.lock().map_err(TriggerError::transport)?;
            state.in_flight = state.in_flight.saturating_sub(1);
            if redeliver {
                if delivery.attempt() < self.max_deliveries {
                    state.pending.push_back(delivery.redelivered());
                } else {
                    warn!(
                        task_id = delivery.task_id(),
                        attempt = delivery.attempt(),
                        "delivery attempts exhausted, dropping trigger"
                    );
                }
            }
        }
        self.changed.notify_waiters();
        Ok(())
    }
}

#[async_trait]
impl SubmissionSink for InMemoryTaskQueue {
    async fn task_submitted(&self, task: &Task) -> Result<(), SubmissionSinkError> {
        self.publish(task.id().to_string())
    }
}

#[async_trait]
impl TriggerSource for InMemoryTaskQueue {
    async fn receive(&self) -> TriggerResult<Option<Delivery>> {
        loop {
            // Registered before inspecting state so a concurrent notify is not lost.
            let notified = self.changed.notified();
            {
                let mut state = self.lock().map_err(TriggerError::transport)?;
                if let Some(delivery) = state.pending.pop_front() {
                    state.in_flight += 1;
                    return Ok(Some(delivery));
                }
                if state.closed && state.in_flight == 0 {
                    return Ok(None);
                }
            }
            notified.await;
        }
    }

    async fn acknowledge(&self, delivery: &Delivery) -> TriggerResult<()> {
        self.settle(delivery, false)
    }

    async fn reject(&self, delivery: &Delivery) -> TriggerResult<()> {
        self.settle(delivery, true)
    }
}
