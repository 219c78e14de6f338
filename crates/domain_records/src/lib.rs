//! Clinical Records Domain
//!
//! This crate models what the billing and reporting core reads from the
//! clinic's record keeping: visit records with their embedded service and
//! prescription lines, and the patients those visits belong to.
//!
//! Record and patient CRUD lives outside the core; this crate only defines
//! the document shapes and the store ports the core consumes:
//!
//! - [`RecordPort`]: lookup by id, date-range scans with the patient joined,
//!   counts since an instant, newest-first samples
//! - [`PatientPort`]: patient counts
//!
//! # Optional fields
//!
//! Documents written by older clients may omit fields. The fallbacks are
//! applied in one place each:
//!
//! - a record without a discount bills with no record-level discount
//! - a patient without a category reports under [`UNSPECIFIED_CATEGORY`]

pub mod record;
pub mod patient;
pub mod ports;
pub mod error;

pub use record::{MedicalRecord, ServiceLine, PrescriptionLine, RecordStatus};
pub use patient::{Patient, PatientCategory, PatientSummary, UNSPECIFIED_CATEGORY};
pub use ports::{RecordPort, PatientPort, RecordDateField, RecordWithPatient};
pub use error::RecordError;
