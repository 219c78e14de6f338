//! Billing DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::{parse_instant, BillingId, MedicalRecordId, Money};
use domain_billing::{BillingQuery, CreateBilling, PaymentStatus, PaymentUpdate};

use super::present;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillingRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "medicalRecordId is required"))]
    pub medical_record_id: String,
    /// Replaces the record's discount when present
    pub discount: Option<Decimal>,
    pub payment_status: Option<String>,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
}

impl CreateBillingRequest {
    pub fn into_command(self) -> Result<CreateBilling, ApiError> {
        let medical_record_id = parse_record_id(&self.medical_record_id)?;
        let payment_status = present(&self.payment_status)
            .map(parse_status)
            .transpose()?;

        Ok(CreateBilling {
            medical_record_id,
            discount: self.discount.map(Money::new),
            payment_status,
            payment_method: self.payment_method,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "paymentStatus is required"))]
    pub payment_status: String,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    /// ISO-8601 date or date-time
    pub paid_date: Option<String>,
}

impl UpdatePaymentRequest {
    pub fn into_update(self) -> Result<PaymentUpdate, ApiError> {
        let mut update = PaymentUpdate::new(parse_status(&self.payment_status)?);
        if let Some(method) = self.payment_method {
            update = update.with_method(method);
        }
        if let Some(paid_date) = present(&self.paid_date) {
            let paid_date = parse_instant(paid_date).map_err(|e| ApiError::BadRequest(e.to_string()))?;
            update = update.paid_on(paid_date);
        }
        Ok(update)
    }
}

/// Query string of `GET /billing`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingListParams {
    pub payment_status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BillingListParams {
    /// The date filter applies only when both bounds are given
    pub fn into_query(self) -> Result<BillingQuery, ApiError> {
        let status = present(&self.payment_status).map(parse_status).transpose()?;
        let start = present(&self.start_date).map(parse_instant).transpose();
        let end = present(&self.end_date).map(parse_instant).transpose();
        let (start, end) = match (start, end) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => return Err(ApiError::BadRequest(e.to_string())),
        };
        Ok(BillingQuery::from_bounds(status, start, end)?)
    }
}

pub fn parse_billing_id(value: &str) -> Result<BillingId, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid billing id '{value}'")))
}

fn parse_record_id(value: &str) -> Result<MedicalRecordId, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid medicalRecordId '{value}'")))
}

fn parse_status(value: &str) -> Result<PaymentStatus, ApiError> {
    value.trim().parse().map_err(ApiError::BadRequest)
}
