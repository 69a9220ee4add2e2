//! Status projection of a task for the submission and status boundary.
//!
//! ```json
//! {
//!   "id": "5f0c...",
//!   "status": "completed",
//!   "timestamps": { "submitted": 1700000000000, "started": 1700000000100, "completed": 1700000000200 },
//!   "problem": { "text": "I am Anna" },
//!   "solution": { "length": 4, "text": "Anna" }
//! }
//! ```
//!
//! Timestamps are epoch milliseconds; unset ones are `null`. `solution` is
//! omitted until a non-empty palindrome has been recorded.

use crate::palindrome::PalindromeSolution;
use crate::task::domain::{ParseTaskIdError, ParseTaskStatusError, Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response shape describing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task identifier.
    pub id: String,
    /// Lower-case status name.
    pub status: String,
    /// Lifecycle timestamps.
    pub timestamps: Timestamps,
    /// Submitted problem.
    pub problem: Problem,
    /// Recorded palindrome, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Solution>,
}

/// Lifecycle timestamps in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Submission time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub submitted: DateTime<Utc>,
    /// Start time, `null` until started.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub started: Option<DateTime<Utc>>,
    /// Completion time, `null` until completed.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub completed: Option<DateTime<Utc>>,
}

/// Text submitted for a palindrome search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Text to search.
    pub text: String,
}

impl Problem {
    /// Creates a problem for `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Longest palindrome found for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Palindrome length in characters.
    pub length: usize,
    /// Palindrome as it appears in the submitted text.
    pub text: String,
}

impl From<&PalindromeSolution> for Solution {
    fn from(solution: &PalindromeSolution) -> Self {
        Self {
            length: solution.length(),
            text: solution.text().to_owned(),
        }
    }
}

impl From<&Task> for TaskOutput {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            status: task.status().as_str().to_owned(),
            timestamps: Timestamps {
                submitted: task.submitted_at(),
                started: task.started_at(),
                completed: task.completed_at(),
            },
            problem: Problem::new(task.text()),
            solution: task.solution().map(Solution::from),
        }
    }
}

impl TaskOutput {
    /// Parses the identifier back into a [`TaskId`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskIdError`] when the identifier is malformed.
    pub fn task_id(&self) -> Result<TaskId, ParseTaskIdError> {
        self.id.parse()
    }

    /// Parses the status name back into a [`TaskStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] for an unknown status name.
    pub fn task_status(&self) -> Result<TaskStatus, ParseTaskStatusError> {
        TaskStatus::try_from(self.status.as_str())
    }
}
