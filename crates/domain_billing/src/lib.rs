//! Billing Domain - Bills derived from medical records
//!
//! A bill is computed from one medical record: every service line and
//! prescription line is copied as a charge, the discount is resolved, and
//! the total is stored alongside the payment state.
//!
//! # Payment states
//!
//! - **Unpaid**: default for new bills
//! - **PartiallyPaid**: some money received
//! - **Paid**: settled; only paid bills count as revenue
//!
//! The documented flow is `Unpaid -> {PartiallyPaid, Paid}` and
//! `PartiallyPaid -> Paid`. [`BillingService`] applies any requested status
//! unless strict transitions are enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingService, CreateBilling, PaymentStatus, PaymentUpdate};
//!
//! let service = BillingService::new(record_port, billing_port);
//! let billing = service.create_billing(CreateBilling::for_record(record_id)).await?;
//! service
//!     .update_payment_status(billing.id, PaymentUpdate::new(PaymentStatus::Paid).with_method("Cash"))
//!     .await?;
//! ```

pub mod billing;
pub mod derivation;
pub mod ports;
pub mod service;
pub mod error;

pub use billing::{Billing, BillingPatch, MedicineCharge, PaymentStatus, ServiceCharge};
pub use derivation::{derive_billing, resolve_discount, CreateBilling};
pub use ports::{BillingPort, BillingQuery};
pub use service::{BillingService, PaymentUpdate};
pub use error::BillingError;
