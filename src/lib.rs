//! Palindromes: a small task service that finds the longest palindromic
//! substring of submitted texts.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and triggering
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`palindrome`]: Linear-time longest palindrome search
//! - [`task`]: Task state machine, ports, adapters and services
//! - [`worker`]: Trigger consumption loop and worker pool
//! - [`config`]: Service configuration loading
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod palindrome;
pub mod task;
pub mod telemetry;
pub mod worker;
