//! # Regolith Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Determinism test harness
//! - Standard data set and simulation fixtures
//! - Property-based testing strategies for player actions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
