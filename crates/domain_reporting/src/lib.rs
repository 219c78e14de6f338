//! Reporting Domain - Clinic revenue and usage aggregates
//!
//! Reports are computed per request from the billing and record stores;
//! nothing is cached between calls.
//!
//! - **Revenue**: paid bills in a window; totals, discount, average per bill
//! - **Patient visits**: records whose visit date *or* creation date falls in
//!   the window, counted per patient category
//! - **Top services**: billed charges and recorded services ranked side by side
//! - **Dashboard**: patients, today's visits, unpaid bills, today's paid revenue
//! - **Samples**: newest records with their patients, for inspection

pub mod aggregate;
pub mod range;
pub mod reports;
pub mod service;
pub mod error;

pub use aggregate::{
    compare_usage, merge_records, patient_visit_report, rank_billed_services, rank_recorded_services,
    revenue_report,
};
pub use range::{optional_window, required_window, resolve_limit, DEFAULT_LIMIT, MAX_LIMIT};
pub use reports::{
    DashboardStats, PatientVisitReport, PatientVisitSummary, RevenueReport, SampleRecords, ServiceUsage,
    TopServicesReport, VisitRow,
};
pub use service::ReportingService;
pub use error::ReportError;
