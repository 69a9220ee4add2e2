//! Port contract for palindrome search implementations.

use super::PalindromeSolution;
use thiserror::Error;

/// Searches a text for its longest palindromic substring.
///
/// Implementations are synchronous and may run for a long time on large
/// inputs; callers on an async executor should move the call onto a
/// blocking thread.
pub trait PalindromeFinder: Send + Sync {
    /// Returns the leftmost longest palindromic substring of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] when the search cannot produce a result.
    fn find(&self, text: &str) -> Result<PalindromeSolution, FinderError>;
}

/// Error raised when a palindrome search fails unexpectedly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("palindrome search failed: {reason}")]
pub struct FinderError {
    reason: String,
}

impl FinderError {
    /// Creates a search failure with a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
