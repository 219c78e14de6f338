//! Reporting errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError, TemporalError};

/// Errors that can occur while computing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Missing or malformed query parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A store query failed; no partial report is returned
    #[error("Report store failure: {0}")]
    Store(#[from] PortError),

    /// Stored amounts add up past the representable range
    #[error("Report amount out of range: {0}")]
    Amount(#[from] MoneyError),
}

impl ReportError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ReportError::InvalidArgument(message.into())
    }
}

impl From<TemporalError> for ReportError {
    fn from(error: TemporalError) -> Self {
        ReportError::InvalidArgument(error.to_string())
    }
}
