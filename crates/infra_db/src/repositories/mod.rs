//! Repository implementations for clinic documents
//!
//! This module provides concrete repository implementations that handle
//! database access for each table. Repositories encapsulate SQL queries
//! and work in row types; the adapters map rows onto domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked SQLx queries with explicit column lists
//! - One statement per write
//! - Embedded line items as JSONB

pub mod records;
pub mod billing;

pub use records::{RecordRepository, PatientRepository, RecordRow, RecordTimestamp};
pub use billing::{BillingRepository, BillingRow, BillingFilter, PaymentChange};
