//! Result of a longest palindromic substring search.

use serde::{Deserialize, Serialize};

/// Longest palindromic substring located in a text, with its length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PalindromeSolution {
    text: String,
    length: usize,
}

impl PalindromeSolution {
    /// Creates a solution from a palindrome, measuring its length in chars.
    #[must_use]
    pub fn new(palindrome: impl Into<String>) -> Self {
        let text: String = palindrome.into();
        let length = text.chars().count();
        Self { text, length }
    }

    /// Returns the zero-length solution reported for empty input.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            text: String::new(),
            length: 0,
        }
    }

    /// Returns the palindrome as it appears in the searched text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the palindrome length in characters.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns `true` when no palindrome was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }
}
