//! Report shapes
//!
//! Reports are derived on every request and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{DateWindow, MedicalRecordId, Money, PatientId};
use domain_records::{PatientCategory, PatientSummary, RecordWithPatient};

/// Paid revenue over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub period: DateWindow,
    pub total_revenue: Money,
    pub total_bills: u64,
    pub total_discount: Money,
    /// Zero when there are no bills
    pub average_per_bill: Money,
}

/// One visit in a patient visit report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRow {
    pub id: MedicalRecordId,
    pub visit_date: DateTime<Utc>,
    /// Presenting complaint recorded at the visit
    pub reason: Option<String>,
    /// `None` when the record points at a missing patient
    pub patient: Option<PatientSummary>,
}

/// Visits per patient over the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVisitSummary {
    pub id: PatientId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub category: Option<PatientCategory>,
    pub visits: u64,
}

/// Visits over a window, segmented by patient category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVisitReport {
    pub period: DateWindow,
    pub total_visits: u64,
    /// Visit count per category label, with missing categories under "Unspecified"
    pub patient_type_counts: BTreeMap<String, u64>,
    pub visit_rows: Vec<VisitRow>,
    pub patient_summaries: Vec<PatientVisitSummary>,
}

/// Usage of one service name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsage {
    pub service_name: String,
    pub count: u64,
    pub total_revenue: Money,
}

/// Service rankings from billed charges and from recorded services
///
/// The two lists are kept side by side so differences between what was
/// performed and what was charged stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopServicesReport {
    pub billing_based: Vec<ServiceUsage>,
    pub record_based: Vec<ServiceUsage>,
}

/// Snapshot counters for the front desk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: u64,
    pub total_records_today: u64,
    pub pending_payments: u64,
    pub today_revenue: Money,
}

/// Newest records for inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecords {
    pub count: usize,
    pub samples: Vec<RecordWithPatient>,
}
