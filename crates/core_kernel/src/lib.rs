//! Core Kernel - Foundational types and utilities for the clinic system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money with precise decimal arithmetic in the clinic's single currency
//! - Date windows and clinic-local day boundaries
//! - Strongly-typed identifiers
//! - Port abstractions shared by every store adapter

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError};
pub use temporal::{DateWindow, Timezone, TemporalError, parse_instant};
pub use identifiers::{
    PatientId, MedicalRecordId, BillingId, ServiceId, MedicineId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
