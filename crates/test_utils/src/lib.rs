//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! clinic billing and reporting test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data (fixed instants, amounts, the worked
//!   billing example)
//! - `builders`: Builder patterns for records and billings
//! - `assertions`: Custom assertion helpers for money and rankings
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
