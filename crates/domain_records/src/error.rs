//! Records domain errors

use thiserror::Error;

/// Errors raised when a record document breaks its invariants
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A service line carries a negative price
    #[error("Service line {index} ('{name}') has a negative price")]
    NegativeServicePrice { index: usize, name: String },

    /// A prescription line carries a negative price
    #[error("Prescription line {index} ('{name}') has a negative price")]
    NegativePrescriptionPrice { index: usize, name: String },

    /// The record-level discount is negative
    #[error("Record discount must not be negative")]
    NegativeDiscount,

    /// Symptoms are required on every visit
    #[error("Symptoms are required")]
    MissingSymptoms,
}

impl RecordError {
    /// Name of the offending document field
    pub fn field(&self) -> &'static str {
        match self {
            RecordError::NegativeServicePrice { .. } => "services",
            RecordError::NegativePrescriptionPrice { .. } => "prescriptions",
            RecordError::NegativeDiscount => "discount",
            RecordError::MissingSymptoms => "symptoms",
        }
    }
}
