//! # Tech Tree Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Catalog element builders and a small Zerg fixture catalog
//! - Stable ID fixtures
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
