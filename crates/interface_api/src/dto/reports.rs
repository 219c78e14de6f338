//! Report query DTOs

use serde::Deserialize;

use core_kernel::DateWindow;
use domain_reporting::{optional_window, required_window};

use super::present;
use crate::error::ApiError;

/// `startDate` and `endDate` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeParams {
    /// Both bounds must be present
    pub fn required(&self) -> Result<DateWindow, ApiError> {
        Ok(required_window(present(&self.start_date), present(&self.end_date))?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopServicesParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

impl TopServicesParams {
    pub fn window(&self) -> Result<Option<DateWindow>, ApiError> {
        Ok(optional_window(present(&self.start_date), present(&self.end_date))?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}
