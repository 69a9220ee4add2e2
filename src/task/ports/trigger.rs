//! Trigger port delivering task identifiers for processing.
//!
//! Delivery is at-least-once: an identifier may arrive zero, one, or many
//! times, in any order, possibly to several consumers at once.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for trigger source operations.
pub type TriggerResult<T> = Result<T, TriggerError>;

/// One delivery of a task identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    task_id: String,
    attempt: u32,
}

impl Delivery {
    /// Creates a first delivery of `task_id`.
    #[must_use]
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            attempt: 1,
        }
    }

    /// Returns the same identifier as the next delivery attempt.
    #[must_use]
    pub fn redelivered(&self) -> Self {
        Self {
            task_id: self.task_id.clone(),
            attempt: self.attempt.saturating_add(1),
        }
    }

    /// Returns the raw task identifier as delivered.
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Returns the 1-based delivery attempt.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Source of task identifiers to process.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Waits for the next delivery.
    ///
    /// Returns `None` once the source is closed and drained.
    async fn receive(&self) -> TriggerResult<Option<Delivery>>;

    /// Confirms that a delivery was handled.
    async fn acknowledge(&self, delivery: &Delivery) -> TriggerResult<()>;

    /// Reports that handling a delivery failed; the source decides whether
    /// to deliver it again.
    async fn reject(&self, delivery: &Delivery) -> TriggerResult<()>;
}

/// Errors returned by trigger sources.
#[derive(Debug, Clone, Error)]
pub enum TriggerError {
    /// Transport-layer failure.
    #[error("trigger transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TriggerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
