//! PostgreSQL Record and Patient Adapters
//!
//! Implements the read-only `RecordPort` and `PatientPort` traits over the
//! `medical_records` and `patients` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    DateWindow, DomainPort, HealthCheckResult, HealthCheckable, MedicalRecordId, Money, PatientId,
    PortError,
};
use domain_records::{
    MedicalRecord, PatientCategory, PatientPort, PatientSummary, RecordDateField, RecordPort,
    RecordStatus, RecordWithPatient,
};

use super::{db_to_port_error, ping};
use crate::error::DatabaseError;
use crate::repositories::records::{PatientRepository, RecordRepository, RecordRow, RecordTimestamp};

/// PostgreSQL-backed implementation of the RecordPort trait
#[derive(Debug, Clone)]
pub struct PostgresRecordAdapter {
    repository: RecordRepository,
    pool: PgPool,
}

impl PostgresRecordAdapter {
    /// Creates a new PostgreSQL record adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RecordRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &RecordRepository {
        &self.repository
    }
}

impl DomainPort for PostgresRecordAdapter {}

#[async_trait]
impl HealthCheckable for PostgresRecordAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-record-adapter").await
    }
}

#[async_trait]
impl RecordPort for PostgresRecordAdapter {
    #[instrument(skip(self), fields(record_id = %id))]
    async fn get_record(&self, id: MedicalRecordId) -> Result<MedicalRecord, PortError> {
        debug!("Fetching medical record by ID");

        let row = self.repository
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;

        row_to_record(row)
            .map(|joined| joined.record)
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(column = field.column()))]
    async fn find_records_by_date_range(
        &self,
        field: RecordDateField,
        window: Option<DateWindow>,
    ) -> Result<Vec<RecordWithPatient>, PortError> {
        let (start, end) = window_bounds(window);
        let rows = self.repository
            .find_in_range(timestamp_for(field), start, end)
            .await
            .map_err(db_to_port_error)?;

        debug!(count = rows.len(), "Loaded medical records");
        rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn count_records_since(&self, since: DateTime<Utc>) -> Result<u64, PortError> {
        let count = self.repository
            .count_visits_since(since)
            .await
            .map_err(db_to_port_error)?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn latest_records(&self, limit: u32) -> Result<Vec<RecordWithPatient>, PortError> {
        let rows = self.repository
            .latest(i64::from(limit))
            .await
            .map_err(db_to_port_error)?;
        rows_to_records(rows)
    }
}

/// PostgreSQL-backed implementation of the PatientPort trait
#[derive(Debug, Clone)]
pub struct PostgresPatientAdapter {
    repository: PatientRepository,
    pool: PgPool,
}

impl PostgresPatientAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PatientRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPatientAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPatientAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-patient-adapter").await
    }
}

#[async_trait]
impl PatientPort for PostgresPatientAdapter {
    #[instrument(skip(self))]
    async fn count_patients(&self) -> Result<u64, PortError> {
        let count = self.repository.count().await.map_err(db_to_port_error)?;
        Ok(count.max(0) as u64)
    }
}

fn timestamp_for(field: RecordDateField) -> RecordTimestamp {
    match field {
        RecordDateField::VisitDate => RecordTimestamp::VisitDate,
        RecordDateField::CreatedAt => RecordTimestamp::CreatedAt,
    }
}

fn window_bounds(window: Option<DateWindow>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match window {
        Some(window) => (Some(window.start_date), Some(window.end_date)),
        None => (None, None),
    }
}

fn rows_to_records(rows: Vec<RecordRow>) -> Result<Vec<RecordWithPatient>, PortError> {
    rows.into_iter()
        .map(|row| row_to_record(row).map_err(db_to_port_error))
        .collect()
}

/// Converts a joined record row to a domain record with its patient
fn row_to_record(row: RecordRow) -> Result<RecordWithPatient, DatabaseError> {
    let status = RecordStatus::parse(&row.status).ok_or_else(|| {
        DatabaseError::CorruptRow(format!("record {} has unknown status '{}'", row.id, row.status))
    })?;

    let patient = row.patient_ref.map(|patient_id| PatientSummary {
        id: PatientId::from(patient_id),
        name: row.patient_name,
        phone: row.patient_phone,
        category: row.patient_category.as_deref().and_then(parse_category),
    });

    let record = MedicalRecord {
        id: MedicalRecordId::from(row.id),
        patient_id: PatientId::from(row.patient_id),
        visit_date: row.visit_date,
        symptoms: row.symptoms,
        diagnosis: row.diagnosis,
        doctor_name: row.doctor_name,
        room_number: row.room_number,
        services: row.services.0,
        prescriptions: row.prescriptions.0,
        discount: row.discount.map(Money::new),
        notes: row.notes,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };

    Ok(RecordWithPatient { record, patient })
}

/// Unknown labels read as "no category" rather than failing the row
fn parse_category(label: &str) -> Option<PatientCategory> {
    match label.parse() {
        Ok(category) => Some(category),
        Err(reason) => {
            debug!(%reason, "Ignoring stored patient category");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sqlx::types::Json;
    use uuid::Uuid;

    use domain_records::ServiceLine;

    fn row(status: &str) -> RecordRow {
        let now = Utc::now();
        RecordRow {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            visit_date: now,
            symptoms: "cough".to_string(),
            diagnosis: None,
            doctor_name: None,
            room_number: None,
            services: Json(vec![ServiceLine::new("Consultation", Money::new(dec!(100)))]),
            prescriptions: Json(vec![]),
            discount: Some(dec!(0)),
            notes: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
            patient_ref: None,
            patient_name: None,
            patient_phone: None,
            patient_category: None,
        }
    }

    #[test]
    fn test_row_without_patient_has_no_summary() {
        let joined = row_to_record(row("Completed")).unwrap();
        assert!(joined.patient.is_none());
        assert_eq!(joined.record.status, RecordStatus::Completed);
        assert_eq!(joined.record.services.len(), 1);
    }

    #[test]
    fn test_explicit_zero_discount_is_kept() {
        let joined = row_to_record(row("InProgress")).unwrap();
        assert_eq!(joined.record.discount, Some(Money::zero()));
    }

    #[test]
    fn test_joined_patient_with_unknown_category() {
        let mut data = row("Completed");
        let patient_id = data.patient_id;
        data.patient_ref = Some(patient_id);
        data.patient_name = Some("An Nguyen".to_string());
        data.patient_category = Some("Platinum".to_string());

        let patient = row_to_record(data).unwrap().patient.unwrap();
        assert_eq!(patient.id, PatientId::from(patient_id));
        assert_eq!(patient.name.as_deref(), Some("An Nguyen"));
        assert!(patient.category.is_none());
    }

    #[test]
    fn test_stored_category_is_case_insensitive() {
        assert_eq!(parse_category("vip"), Some(PatientCategory::Vip));
        assert_eq!(parse_category("Insured"), Some(PatientCategory::Insured));
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let error = row_to_record(row("Archived")).unwrap_err();
        assert!(matches!(error, DatabaseError::CorruptRow(_)));
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(window_bounds(None), (None, None));
        let start = Utc::now();
        let window = DateWindow { start_date: start, end_date: start };
        assert_eq!(window_bounds(Some(window)), (Some(start), Some(start)));
    }
}
