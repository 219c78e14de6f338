//! Medical record repository implementation
//!
//! Reads visit records with their patient joined. Service and prescription
//! lines are stored as JSONB arrays on the record row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use domain_records::{PrescriptionLine, ServiceLine};

use crate::error::DatabaseError;

const RECORD_SELECT: &str = r#"
    SELECT
        r.id,
        r.patient_id,
        r.visit_date,
        r.symptoms,
        r.diagnosis,
        r.doctor_name,
        r.room_number,
        r.services,
        r.prescriptions,
        r.discount,
        r.notes,
        r.status,
        r.created_at,
        r.updated_at,
        p.id AS patient_ref,
        p.full_name AS patient_name,
        p.phone AS patient_phone,
        p.category AS patient_category
    FROM medical_records r
    LEFT JOIN patients p ON p.id = r.patient_id
"#;

/// Timestamp column a window scan filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTimestamp {
    VisitDate,
    CreatedAt,
}

impl RecordTimestamp {
    fn column(&self) -> &'static str {
        match self {
            RecordTimestamp::VisitDate => "r.visit_date",
            RecordTimestamp::CreatedAt => "r.created_at",
        }
    }
}

/// A medical record row with the patient columns from the left join
///
/// `patient_ref` is NULL when the referenced patient row is missing.
#[derive(Debug, Clone, FromRow)]
pub struct RecordRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: DateTime<Utc>,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub doctor_name: Option<String>,
    pub room_number: Option<String>,
    pub services: Json<Vec<ServiceLine>>,
    pub prescriptions: Json<Vec<PrescriptionLine>>,
    pub discount: Option<Decimal>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient_ref: Option<Uuid>,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_category: Option<String>,
}

/// Repository for medical records
#[derive(Debug, Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    /// Creates a new RecordRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a record by id
    ///
    /// # Returns
    ///
    /// The record row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, id: Uuid) -> Result<RecordRow, DatabaseError> {
        let sql = format!("{RECORD_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("MedicalRecord", id))
    }

    /// Finds records whose timestamp lies in `[start, end]`
    ///
    /// A `None` bound leaves that side open.
    pub async fn find_in_range(
        &self,
        timestamp: RecordTimestamp,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<RecordRow>, DatabaseError> {
        let column = timestamp.column();
        let sql = format!(
            "{RECORD_SELECT}
             WHERE ($1::timestamptz IS NULL OR {column} >= $1)
               AND ($2::timestamptz IS NULL OR {column} <= $2)
             ORDER BY {column}, r.id"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Counts records visited at or after `since`
    pub async fn count_visits_since(&self, since: DateTime<Utc>) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM medical_records WHERE visit_date >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Retrieves the newest records by creation time
    pub async fn latest(&self, limit: i64) -> Result<Vec<RecordRow>, DatabaseError> {
        let sql = format!("{RECORD_SELECT} ORDER BY r.created_at DESC, r.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Repository for patients
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Counts all patients
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
