//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the clinic billing
//! and reporting services, using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL and
//! work in row types; adapters implement the domain ports on top of them
//! and translate rows into domain documents.
//!
//! # Storage Model
//!
//! Records and billings keep their line items as JSONB arrays, so a billing
//! is a self-contained snapshot of the charges it was derived from. Money
//! columns are NUMERIC.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresBillingAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/clinic")).await?;
//! run_migrations(&pool).await?;
//! let billings = PostgresBillingAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
pub use error::DatabaseError;
pub use adapters::{PostgresBillingAdapter, PostgresPatientAdapter, PostgresRecordAdapter};
