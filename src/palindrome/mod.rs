//! Longest palindromic substring search.
//!
//! The [`PalindromeFinder`] port decouples task processing from the search
//! algorithm. [`ManacherFinder`] is the production implementation and runs in
//! linear time over the number of characters in the input.

mod finder;
mod manacher;
mod solution;

pub use finder::{FinderError, PalindromeFinder};
pub use manacher::{ManacherFinder, longest_palindrome};
pub use solution::PalindromeSolution;
