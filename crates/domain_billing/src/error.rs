//! Billing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};
use domain_records::RecordError;

use crate::billing::PaymentStatus;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// The medical record to bill does not exist
    #[error("Medical record not found: {0}")]
    RecordNotFound(String),

    /// Billing not found
    #[error("Billing not found: {0}")]
    BillingNotFound(String),

    /// Malformed request value (status label, date bound, discount)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The document breaks a schema constraint
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Off-table payment transition while strict transitions are on
    #[error("Cannot change payment status from {from} to {to}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// The underlying store failed
    #[error("Billing store failure: {0}")]
    Store(#[source] PortError),
}

impl BillingError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BillingError::InvalidArgument(message.into())
    }

    /// True for the not-found variants
    pub fn is_not_found(&self) -> bool {
        matches!(self, BillingError::RecordNotFound(_) | BillingError::BillingNotFound(_))
    }
}

impl From<PortError> for BillingError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } if entity_type == "MedicalRecord" => {
                BillingError::RecordNotFound(id)
            }
            PortError::NotFound { id, .. } => BillingError::BillingNotFound(id),
            PortError::Validation { message, field } => BillingError::Validation { message, field },
            PortError::Conflict { message } => BillingError::Validation { message, field: None },
            other => BillingError::Store(other),
        }
    }
}

impl From<MoneyError> for BillingError {
    fn from(error: MoneyError) -> Self {
        BillingError::Validation {
            message: error.to_string(),
            field: None,
        }
    }
}

impl From<RecordError> for BillingError {
    fn from(error: RecordError) -> Self {
        BillingError::Validation {
            field: Some(error.field().to_string()),
            message: error.to_string(),
        }
    }
}
