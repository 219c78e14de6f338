//! Record and Patient Store Ports
//!
//! The billing engine and the report aggregator read visit records and
//! patients through these traits. Record CRUD is owned by another part of
//! the clinic system, so the ports are read-only.
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::adapters::PostgresRecordAdapter` and
//!   `PostgresPatientAdapter`
//! - **Mock**: [`mock::MockRecordPort`], an in-memory store implementing
//!   both ports, for service and API tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_records::{RecordPort, RecordDateField};
//!
//! let by_visit = records
//!     .find_records_by_date_range(RecordDateField::VisitDate, Some(window))
//!     .await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DateWindow, DomainPort, HealthCheckable, MedicalRecordId, PortError};

use crate::patient::PatientSummary;
use crate::record::MedicalRecord;

/// Which record timestamp a date-range scan filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordDateField {
    /// When the visit took place
    VisitDate,
    /// When the record was stored
    CreatedAt,
}

impl RecordDateField {
    /// Reads the selected timestamp from a record
    pub fn of(&self, record: &MedicalRecord) -> DateTime<Utc> {
        match self {
            RecordDateField::VisitDate => record.visit_date,
            RecordDateField::CreatedAt => record.created_at,
        }
    }

    /// Storage column name
    pub fn column(&self) -> &'static str {
        match self {
            RecordDateField::VisitDate => "visit_date",
            RecordDateField::CreatedAt => "created_at",
        }
    }
}

/// A record with its patient joined
///
/// `patient` is `None` when the record references a patient that no longer
/// exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWithPatient {
    #[serde(flatten)]
    pub record: MedicalRecord,
    pub patient: Option<PatientSummary>,
}

/// Port for the Medical Record Store
#[async_trait]
pub trait RecordPort: DomainPort + HealthCheckable {
    /// Gets a record by id
    ///
    /// # Returns
    ///
    /// The record, or `PortError::NotFound`
    async fn get_record(&self, id: MedicalRecordId) -> Result<MedicalRecord, PortError>;

    /// Finds records whose `field` timestamp falls inside the window, with
    /// the patient joined
    ///
    /// # Arguments
    ///
    /// * `field` - Timestamp to filter on
    /// * `window` - Inclusive window; `None` selects every record
    async fn find_records_by_date_range(
        &self,
        field: RecordDateField,
        window: Option<DateWindow>,
    ) -> Result<Vec<RecordWithPatient>, PortError>;

    /// Counts records whose visit date is at or after `since`
    async fn count_records_since(&self, since: DateTime<Utc>) -> Result<u64, PortError>;

    /// Gets the most recently created records, newest first
    async fn latest_records(&self, limit: u32) -> Result<Vec<RecordWithPatient>, PortError>;
}

/// Port for the Patient Store
#[async_trait]
pub trait PatientPort: DomainPort + HealthCheckable {
    /// Counts all registered patients
    async fn count_patients(&self) -> Result<u64, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult, PatientId};
    use crate::patient::Patient;

    /// In-memory mock implementing both [`RecordPort`] and [`PatientPort`]
    #[derive(Debug, Default)]
    pub struct MockRecordPort {
        records: Arc<RwLock<HashMap<MedicalRecordId, MedicalRecord>>>,
        patients: Arc<RwLock<HashMap<PatientId, Patient>>>,
        unavailable: AtomicBool,
    }

    impl MockRecordPort {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with patients and records for testing
        pub async fn with_data(patients: Vec<Patient>, records: Vec<MedicalRecord>) -> Self {
            let port = Self::new();
            for patient in patients {
                port.insert_patient(patient).await;
            }
            for record in records {
                port.insert_record(record).await;
            }
            port
        }

        pub async fn insert_patient(&self, patient: Patient) {
            self.patients.write().await.insert(patient.id, patient);
        }

        pub async fn insert_record(&self, record: MedicalRecord) {
            self.records.write().await.insert(record.id, record);
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock record store unavailable"));
            }
            Ok(())
        }

        fn join(record: &MedicalRecord, patients: &HashMap<PatientId, Patient>) -> RecordWithPatient {
            RecordWithPatient {
                record: record.clone(),
                patient: patients.get(&record.patient_id).map(Patient::summary),
            }
        }
    }

    impl DomainPort for MockRecordPort {}

    #[async_trait]
    impl HealthCheckable for MockRecordPort {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.unavailable.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult {
                adapter_id: "mock-record-port".to_string(),
                status,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl RecordPort for MockRecordPort {
        async fn get_record(&self, id: MedicalRecordId) -> Result<MedicalRecord, PortError> {
            self.check_available()?;
            self.records
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("MedicalRecord", id))
        }

        async fn find_records_by_date_range(
            &self,
            field: RecordDateField,
            window: Option<DateWindow>,
        ) -> Result<Vec<RecordWithPatient>, PortError> {
            self.check_available()?;
            let records = self.records.read().await;
            let patients = self.patients.read().await;
            let mut found: Vec<RecordWithPatient> = records
                .values()
                .filter(|r| window.map_or(true, |w| w.contains(field.of(r))))
                .map(|r| Self::join(r, &patients))
                .collect();
            found.sort_by_key(|r| (field.of(&r.record), r.record.id));
            Ok(found)
        }

        async fn count_records_since(&self, since: DateTime<Utc>) -> Result<u64, PortError> {
            self.check_available()?;
            let records = self.records.read().await;
            Ok(records.values().filter(|r| r.visit_date >= since).count() as u64)
        }

        async fn latest_records(&self, limit: u32) -> Result<Vec<RecordWithPatient>, PortError> {
            self.check_available()?;
            let records = self.records.read().await;
            let patients = self.patients.read().await;
            let mut all: Vec<&MedicalRecord> = records.values().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
            Ok(all
                .into_iter()
                .take(limit as usize)
                .map(|r| Self::join(r, &patients))
                .collect())
        }
    }

    #[async_trait]
    impl PatientPort for MockRecordPort {
        async fn count_patients(&self) -> Result<u64, PortError> {
            self.check_available()?;
            Ok(self.patients.read().await.len() as u64)
        }
    }
}
