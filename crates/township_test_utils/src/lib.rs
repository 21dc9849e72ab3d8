//! # Township Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Scriptable building and event fixtures, fixed dice
//! - Invariant checks over a whole game state
//! - Determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod invariants;

/// Re-export proptest for convenience.
pub use proptest;
