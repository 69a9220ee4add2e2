//! Application services for palindrome task processing.

mod output;
mod processor;
mod submission;

pub use output::{Problem, Solution, TaskOutput, Timestamps};
pub use processor::{ProcessOutcome, TaskProcessor, TaskProcessorError, TaskProcessorResult};
pub use submission::{TaskSubmissionError, TaskSubmissionResult, TaskSubmissionService};
