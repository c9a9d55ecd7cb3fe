//! Shared test utilities for the smooth-map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Seeded random point generators
//! - Synthetic surface patterns (gradients, peaks, bimodal fields)
//! - Simple polygon fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
