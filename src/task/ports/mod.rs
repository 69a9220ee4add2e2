//! Port contracts for palindrome task processing.
//!
//! Ports define infrastructure-agnostic interfaces used by task services:
//! persistence, fan-out after submission, and the at-least-once trigger
//! that drives processing.

pub mod notification;
pub mod store;
pub mod trigger;

pub use notification::{SubmissionSink, SubmissionSinkError};
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
pub use trigger::{Delivery, TriggerError, TriggerResult, TriggerSource};
