//! Query-parameter parsing shared by the report endpoints

use core_kernel::{parse_instant, DateWindow};

use crate::error::ReportError;

/// Default number of entries in a ranking
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted ranking or sample size
pub const MAX_LIMIT: u32 = 100;

/// Parses a window whose bounds are both required
pub fn required_window(start: Option<&str>, end: Option<&str>) -> Result<DateWindow, ReportError> {
    match (non_blank(start), non_blank(end)) {
        (Some(start), Some(end)) => Ok(DateWindow::parse(start, end)?),
        _ => Err(ReportError::invalid_argument("startDate and endDate are required")),
    }
}

/// Parses a window that applies only when both bounds are given
///
/// A single bound is ignored; a malformed bound is still rejected.
pub fn optional_window(start: Option<&str>, end: Option<&str>) -> Result<Option<DateWindow>, ReportError> {
    let start = non_blank(start).map(parse_instant).transpose()?;
    let end = non_blank(end).map(parse_instant).transpose()?;
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(DateWindow::new(start, end)?)),
        _ => Ok(None),
    }
}

/// Resolves a ranking size, defaulting when absent
pub fn resolve_limit(limit: Option<u32>) -> Result<usize, ReportError> {
    match limit.unwrap_or(DEFAULT_LIMIT) {
        0 => Err(ReportError::invalid_argument("limit must be at least 1")),
        n if n > MAX_LIMIT => Err(ReportError::invalid_argument(format!(
            "limit must be at most {MAX_LIMIT}"
        ))),
        n => Ok(n as usize),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
