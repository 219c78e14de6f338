//! Billing repository implementation
//!
//! This module provides database access for billing documents. Charge lines
//! are JSONB snapshots; money columns are NUMERIC.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use domain_billing::{MedicineCharge, ServiceCharge};

use crate::error::DatabaseError;

const BILLING_COLUMNS: &str = r#"
    id, medical_record_id, patient_id, service_charges, medicine_charges,
    subtotal, discount, total_amount, payment_status, payment_method,
    paid_date, created_at, updated_at
"#;

/// A billing row
#[derive(Debug, Clone, FromRow)]
pub struct BillingRow {
    pub id: Uuid,
    pub medical_record_id: Uuid,
    pub patient_id: Uuid,
    pub service_charges: Json<Vec<ServiceCharge>>,
    pub medicine_charges: Json<Vec<MedicineCharge>>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for [`BillingRepository::find`]; `None` disables a filter
#[derive(Debug, Clone, Default)]
pub struct BillingFilter {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub payment_status: Option<String>,
    pub medical_record_id: Option<Uuid>,
}

/// Payment columns written by [`BillingRepository::update_payment`]
#[derive(Debug, Clone)]
pub struct PaymentChange {
    pub payment_status: String,
    /// `None` keeps the stored method
    pub payment_method: Option<String>,
    /// Written as given; `None` clears the column
    pub paid_date: Option<DateTime<Utc>>,
}

/// Repository for billing documents
///
/// Every write is a single statement, so a failed call leaves no partial row.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    /// Creates a new BillingRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a billing row and returns it as stored
    pub async fn insert(&self, row: &BillingRow) -> Result<BillingRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO billings ({BILLING_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {BILLING_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, BillingRow>(&sql)
            .bind(row.id)
            .bind(row.medical_record_id)
            .bind(row.patient_id)
            .bind(&row.service_charges)
            .bind(&row.medicine_charges)
            .bind(row.subtotal)
            .bind(row.discount)
            .bind(row.total_amount)
            .bind(&row.payment_status)
            .bind(&row.payment_method)
            .bind(row.paid_date)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    /// Retrieves a billing by id
    ///
    /// # Returns
    ///
    /// The billing row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, id: Uuid) -> Result<BillingRow, DatabaseError> {
        let sql = format!("SELECT {BILLING_COLUMNS} FROM billings WHERE id = $1");
        sqlx::query_as::<_, BillingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Billing", id))
    }

    /// Finds billings matching the filter, newest first
    pub async fn find(&self, filter: &BillingFilter) -> Result<Vec<BillingRow>, DatabaseError> {
        let sql = format!(
            "SELECT {BILLING_COLUMNS} FROM billings
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)
               AND ($2::timestamptz IS NULL OR created_at <= $2)
               AND ($3::text IS NULL OR payment_status = $3)
               AND ($4::uuid IS NULL OR medical_record_id = $4)
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, BillingRow>(&sql)
            .bind(filter.created_from)
            .bind(filter.created_to)
            .bind(&filter.payment_status)
            .bind(filter.medical_record_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Writes payment columns and returns the updated row
    pub async fn update_payment(&self, id: Uuid, change: &PaymentChange) -> Result<BillingRow, DatabaseError> {
        let sql = format!(
            "UPDATE billings
             SET payment_status = $2,
                 payment_method = COALESCE($3, payment_method),
                 paid_date = $4,
                 updated_at = now()
             WHERE id = $1
             RETURNING {BILLING_COLUMNS}"
        );
        sqlx::query_as::<_, BillingRow>(&sql)
            .bind(id)
            .bind(&change.payment_status)
            .bind(&change.payment_method)
            .bind(change.paid_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Billing", id))
    }

    /// Counts billings in a payment status
    pub async fn count_by_status(&self, payment_status: &str) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM billings WHERE payment_status = $1",
        )
        .bind(payment_status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Sums `total_amount` of paid billings created at or after `since`
    pub async fn sum_paid_since(&self, since: DateTime<Utc>) -> Result<Decimal, DatabaseError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM billings
            WHERE payment_status = 'Paid' AND created_at >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
