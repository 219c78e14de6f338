//! PostgreSQL Billing Adapter
//!
//! This module provides the database adapter for the billing domain,
//! implementing the `BillingPort` trait using the `BillingRepository`.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
//! - Constraint violations -> `PortError::Validation`
//! - Other errors -> `PortError::Internal`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    BillingId, DomainPort, HealthCheckResult, HealthCheckable, MedicalRecordId, Money, PatientId,
    PortError,
};
use domain_billing::{Billing, BillingPatch, BillingPort, BillingQuery, PaymentStatus};

use super::{db_to_port_error, ping};
use crate::error::DatabaseError;
use crate::repositories::billing::{BillingFilter, BillingRepository, BillingRow, PaymentChange};

/// PostgreSQL-backed implementation of the BillingPort trait
#[derive(Debug, Clone)]
pub struct PostgresBillingAdapter {
    repository: BillingRepository,
    pool: PgPool,
}

impl PostgresBillingAdapter {
    /// Creates a new PostgreSQL billing adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &BillingRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillingAdapter {}

#[async_trait]
impl HealthCheckable for PostgresBillingAdapter {
    /// Checks database connectivity with a `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-billing-adapter").await
    }
}

#[async_trait]
impl BillingPort for PostgresBillingAdapter {
    #[instrument(skip(self, billing), fields(billing_id = %billing.id))]
    async fn insert_billing(&self, billing: &Billing) -> Result<Billing, PortError> {
        debug!("Inserting billing");

        let stored = self.repository
            .insert(&billing_to_row(billing))
            .await
            .map_err(db_to_port_error)?;

        row_to_billing(stored).map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(billing_id = %id))]
    async fn get_billing(&self, id: BillingId) -> Result<Billing, PortError> {
        let row = self.repository
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;

        row_to_billing(row).map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_billings(&self, query: &BillingQuery) -> Result<Vec<Billing>, PortError> {
        let rows = self.repository
            .find(&query_to_filter(query))
            .await
            .map_err(db_to_port_error)?;

        debug!(count = rows.len(), "Loaded billings");
        rows.into_iter()
            .map(|row| row_to_billing(row).map_err(db_to_port_error))
            .collect()
    }

    #[instrument(skip(self, patch), fields(billing_id = %id, status = %patch.payment_status))]
    async fn update_billing(&self, id: BillingId, patch: &BillingPatch) -> Result<Billing, PortError> {
        let change = PaymentChange {
            payment_status: patch.payment_status.as_str().to_string(),
            payment_method: patch.payment_method.clone(),
            paid_date: patch.paid_date,
        };

        let row = self.repository
            .update_payment(id.into(), &change)
            .await
            .map_err(db_to_port_error)?;

        row_to_billing(row).map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn count_billings_by_status(&self, status: PaymentStatus) -> Result<u64, PortError> {
        let count = self.repository
            .count_by_status(status.as_str())
            .await
            .map_err(db_to_port_error)?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn sum_paid_revenue_since(&self, since: DateTime<Utc>) -> Result<Money, PortError> {
        let total = self.repository
            .sum_paid_since(since)
            .await
            .map_err(db_to_port_error)?;
        Ok(Money::new(total))
    }
}

fn query_to_filter(query: &BillingQuery) -> BillingFilter {
    BillingFilter {
        created_from: query.window.map(|w| w.start_date),
        created_to: query.window.map(|w| w.end_date),
        payment_status: query.payment_status.map(|s| s.as_str().to_string()),
        medical_record_id: query.medical_record_id.map(Into::into),
    }
}

fn billing_to_row(billing: &Billing) -> BillingRow {
    BillingRow {
        id: billing.id.into(),
        medical_record_id: billing.medical_record_id.into(),
        patient_id: billing.patient_id.into(),
        service_charges: Json(billing.service_charges.clone()),
        medicine_charges: Json(billing.medicine_charges.clone()),
        subtotal: billing.subtotal.amount(),
        discount: billing.discount.amount(),
        total_amount: billing.total_amount.amount(),
        payment_status: billing.payment_status.as_str().to_string(),
        payment_method: billing.payment_method.clone(),
        paid_date: billing.paid_date,
        created_at: billing.created_at,
        updated_at: billing.updated_at,
    }
}

/// Converts a database row to a domain billing
fn row_to_billing(row: BillingRow) -> Result<Billing, DatabaseError> {
    let payment_status: PaymentStatus = row.payment_status.parse().map_err(|reason| {
        DatabaseError::CorruptRow(format!("billing {}: {}", row.id, reason))
    })?;

    Ok(Billing {
        id: BillingId::from(row.id),
        medical_record_id: MedicalRecordId::from(row.medical_record_id),
        patient_id: PatientId::from(row.patient_id),
        service_charges: row.service_charges.0,
        medicine_charges: row.medicine_charges.0,
        subtotal: Money::new(row.subtotal),
        discount: Money::new(row.discount),
        total_amount: Money::new(row.total_amount),
        payment_status,
        payment_method: row.payment_method,
        paid_date: row.paid_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use core_kernel::DateWindow;
    use domain_billing::{MedicineCharge, ServiceCharge};

    fn sample_billing() -> Billing {
        let now = Utc::now();
        Billing {
            id: BillingId::new_v7(),
            medical_record_id: MedicalRecordId::new(),
            patient_id: PatientId::new(),
            service_charges: vec![ServiceCharge::new("Consultation", Money::new(dec!(100)))],
            medicine_charges: vec![MedicineCharge {
                medicine_name: "Paracetamol".to_string(),
                price: Money::new(dec!(10)),
                quantity: 3,
            }],
            subtotal: Money::new(dec!(130)),
            discount: Money::new(dec!(20)),
            total_amount: Money::new(dec!(110)),
            payment_status: PaymentStatus::PartiallyPaid,
            payment_method: Some("cash".to_string()),
            paid_date: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_conversion_preserves_document() {
        let billing = sample_billing();
        let restored = row_to_billing(billing_to_row(&billing)).unwrap();
        assert_eq!(restored, billing);
    }

    #[test]
    fn test_status_is_stored_by_label() {
        let row = billing_to_row(&sample_billing());
        assert_eq!(row.payment_status, "PartiallyPaid");
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let mut row = billing_to_row(&sample_billing());
        row.payment_status = "Refunded".to_string();
        assert!(matches!(row_to_billing(row), Err(DatabaseError::CorruptRow(_))));
    }

    #[test]
    fn test_query_to_filter() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let record_id = MedicalRecordId::new();
        let query = BillingQuery {
            window: Some(DateWindow { start_date: start, end_date: end }),
            payment_status: Some(PaymentStatus::Paid),
            medical_record_id: Some(record_id),
        };

        let filter = query_to_filter(&query);
        assert_eq!(filter.created_from, Some(start));
        assert_eq!(filter.created_to, Some(end));
        assert_eq!(filter.payment_status.as_deref(), Some("Paid"));
        assert_eq!(filter.medical_record_id, Some(record_id.into()));
    }

    #[test]
    fn test_empty_query_disables_filters() {
        let filter = query_to_filter(&BillingQuery::new());
        assert!(filter.created_from.is_none());
        assert!(filter.payment_status.is_none());
        assert!(filter.medical_record_id.is_none());
    }
}
