//! Palindrome task lifecycle.
//!
//! A task records a submitted text and moves through `Submitted`, `Started`
//! and `Completed` while the longest palindrome in the text is computed.
//! Processing is triggered at least once per submission and stays correct
//! under duplicate or concurrent triggers. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
