//! Step definitions for palindrome task processing scenarios.

pub mod world;
