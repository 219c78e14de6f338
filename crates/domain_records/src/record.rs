//! Medical record documents
//!
//! A medical record is one clinical visit. Services performed and medicines
//! prescribed are embedded as ordered line lists; billing snapshots them at
//! derivation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{MedicalRecordId, MedicineId, Money, MoneyError, PatientId, ServiceId};
use crate::error::RecordError;

/// Clinical status of a visit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Patient is being examined
    #[default]
    InProgress,
    /// Visit finished
    Completed,
    /// Visit cancelled
    Cancelled,
}

impl RecordStatus {
    /// Stable storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::InProgress => "InProgress",
            RecordStatus::Completed => "Completed",
            RecordStatus::Cancelled => "Cancelled",
        }
    }

    /// Parses a storage label
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "InProgress" => Some(RecordStatus::InProgress),
            "Completed" => Some(RecordStatus::Completed),
            "Cancelled" => Some(RecordStatus::Cancelled),
            _ => None,
        }
    }
}

/// A service performed during the visit
///
/// Service lines carry no quantity; each line is one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    /// Catalogue service, when the line was picked from the catalogue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    /// Name as shown on the record
    #[serde(default)]
    pub service_name: String,
    /// Price charged for this occurrence
    #[serde(default)]
    pub price: Money,
}

impl ServiceLine {
    pub fn new(service_name: impl Into<String>, price: Money) -> Self {
        Self {
            service_id: None,
            service_name: service_name.into(),
            price,
        }
    }

    pub fn with_service_id(mut self, service_id: ServiceId) -> Self {
        self.service_id = Some(service_id);
        self
    }
}

/// A medicine prescribed during the visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_id: Option<MedicineId>,
    #[serde(default)]
    pub medicine_name: String,
    /// Units dispensed
    #[serde(default)]
    pub quantity: u32,
    /// Dispensing unit (tablet, bottle, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Price per unit
    #[serde(default)]
    pub price: Money,
    /// Dosage instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

impl PrescriptionLine {
    pub fn new(medicine_name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            medicine_id: None,
            medicine_name: medicine_name.into(),
            quantity,
            unit: None,
            price,
            dosage: None,
        }
    }

    pub fn with_medicine_id(mut self, medicine_id: MedicineId) -> Self {
        self.medicine_id = Some(medicine_id);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }

    /// Price times units dispensed
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.price.checked_times(self.quantity)
    }
}

/// One clinical visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: MedicalRecordId,
    pub patient_id: PatientId,
    /// When the visit took place; set at creation
    pub visit_date: DateTime<Utc>,
    pub symptoms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
    #[serde(default)]
    pub prescriptions: Vec<PrescriptionLine>,
    /// Record-level discount; absent means none was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    /// Creates an in-progress record for a visit
    pub fn new(patient_id: PatientId, visit_date: DateTime<Utc>, symptoms: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MedicalRecordId::new_v7(),
            patient_id,
            visit_date,
            symptoms: symptoms.into(),
            diagnosis: None,
            doctor_name: None,
            room_number: None,
            services: Vec::new(),
            prescriptions: Vec::new(),
            discount: None,
            notes: None,
            status: RecordStatus::InProgress,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_service(mut self, line: ServiceLine) -> Self {
        self.services.push(line);
        self
    }

    pub fn with_prescription(mut self, line: PrescriptionLine) -> Self {
        self.prescriptions.push(line);
        self
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.diagnosis = Some(diagnosis.into());
        self
    }

    pub fn with_doctor(mut self, doctor_name: impl Into<String>, room_number: impl Into<String>) -> Self {
        self.doctor_name = Some(doctor_name.into());
        self.room_number = Some(room_number.into());
        self
    }

    /// Overrides the storage timestamp (imports, back-dated entry)
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    pub fn complete(&mut self) {
        self.status = RecordStatus::Completed;
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self) {
        self.status = RecordStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    /// Checks the document invariants: non-negative prices and discount,
    /// non-empty symptoms
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.symptoms.trim().is_empty() {
            return Err(RecordError::MissingSymptoms);
        }
        if let Some((index, line)) = self.services.iter().enumerate().find(|(_, l)| l.price.is_negative()) {
            return Err(RecordError::NegativeServicePrice {
                index,
                name: line.service_name.clone(),
            });
        }
        if let Some((index, line)) = self.prescriptions.iter().enumerate().find(|(_, l)| l.price.is_negative()) {
            return Err(RecordError::NegativePrescriptionPrice {
                index,
                name: line.medicine_name.clone(),
            });
        }
        if self.discount.is_some_and(|d| d.is_negative()) {
            return Err(RecordError::NegativeDiscount);
        }
        Ok(())
    }
}
