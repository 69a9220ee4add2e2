//! Task value type and lifecycle status.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use crate::palindrome::PalindromeSolution;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Status only moves forward: `Submitted -> Started -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been persisted and awaits processing.
    Submitted,
    /// Palindrome search has begun.
    Started,
    /// Palindrome search has finished and its result is recorded.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical lower-case representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Started => "started",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` when moving from `self` to `target` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Submitted, Self::Started) | (Self::Started, Self::Completed)
        )
    }

    /// Returns `true` when no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "submitted" => Ok(Self::Submitted),
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// A request to find the longest palindromic substring of a text, together
/// with its progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    text: String,
    status: TaskStatus,
    submitted_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    solution: Option<PalindromeSolution>,
}

impl Task {
    /// Creates a newly submitted task for `text`.
    #[must_use]
    pub fn submit(text: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            status: TaskStatus::Submitted,
            submitted_at: clock.utc(),
            started_at: None,
            completed_at: None,
            solution: None,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the submitted text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Returns the start timestamp, if any.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the recorded palindrome, if any.
    #[must_use]
    pub const fn solution(&self) -> Option<&PalindromeSolution> {
        self.solution.as_ref()
    }

    /// Returns `true` when the task is submitted and has never started.
    #[must_use]
    pub const fn is_awaiting_start(&self) -> bool {
        self.status.can_transition_to(TaskStatus::Started) && self.started_at.is_none()
    }

    /// Returns `true` when the task has started and has never completed.
    #[must_use]
    pub const fn is_awaiting_completion(&self) -> bool {
        self.status.can_transition_to(TaskStatus::Completed) && self.completed_at.is_none()
    }

    /// Returns a copy of this task moved to [`TaskStatus::Started`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// awaiting start.
    pub fn start(&self, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        if !self.is_awaiting_start() {
            return Err(self.rejected(TaskStatus::Started));
        }
        Ok(Self {
            status: TaskStatus::Started,
            started_at: Some(clock.utc()),
            ..self.clone()
        })
    }

    /// Returns a copy of this task moved to [`TaskStatus::Completed`].
    ///
    /// The solution is attached only when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// awaiting completion.
    pub fn complete(
        &self,
        completed_at: DateTime<Utc>,
        solution: &PalindromeSolution,
    ) -> Result<Self, TaskDomainError> {
        if !self.is_awaiting_completion() {
            return Err(self.rejected(TaskStatus::Completed));
        }
        Ok(Self {
            status: TaskStatus::Completed,
            completed_at: Some(completed_at),
            solution: (!solution.is_empty()).then(|| solution.clone()),
            ..self.clone()
        })
    }

    const fn rejected(&self, to: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
            to,
        }
    }
}
