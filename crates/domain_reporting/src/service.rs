//! Reporting service
//!
//! Fetches documents through the store ports and hands them to the pure
//! aggregations in [`crate::aggregate`]. A failed store call fails the whole
//! report.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use core_kernel::{DateWindow, Timezone};
use domain_billing::{BillingPort, BillingQuery, PaymentStatus};
use domain_records::{PatientPort, RecordDateField, RecordPort};

use crate::aggregate::{
    merge_records, patient_visit_report, rank_billed_services, rank_recorded_services, revenue_report,
};
use crate::error::ReportError;
use crate::range::resolve_limit;
use crate::reports::{DashboardStats, PatientVisitReport, RevenueReport, SampleRecords, TopServicesReport};

/// Application service for clinic reports
pub struct ReportingService {
    records: Arc<dyn RecordPort>,
    patients: Arc<dyn PatientPort>,
    billings: Arc<dyn BillingPort>,
    timezone: Timezone,
}

impl ReportingService {
    /// Creates a reporting service that starts the day at UTC midnight
    pub fn new(
        records: Arc<dyn RecordPort>,
        patients: Arc<dyn PatientPort>,
        billings: Arc<dyn BillingPort>,
    ) -> Self {
        Self {
            records,
            patients,
            billings,
            timezone: Timezone::default(),
        }
    }

    /// Sets the clinic timezone used for "today"
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Revenue from paid bills created inside the window
    #[instrument(skip(self))]
    pub async fn revenue_report(&self, period: DateWindow) -> Result<RevenueReport, ReportError> {
        let query = BillingQuery::new().in_window(period).with_status(PaymentStatus::Paid);
        let billings = self.billings.find_billings(&query).await?;
        let report = revenue_report(period, &billings)?;

        info!(
            total_bills = report.total_bills,
            total_revenue = %report.total_revenue,
            "Revenue report computed"
        );
        Ok(report)
    }

    /// Visits whose visit date or creation date falls inside the window
    #[instrument(skip(self))]
    pub async fn patient_visit_report(&self, period: DateWindow) -> Result<PatientVisitReport, ReportError> {
        let (by_visit, by_creation) = tokio::try_join!(
            self.records.find_records_by_date_range(RecordDateField::VisitDate, Some(period)),
            self.records.find_records_by_date_range(RecordDateField::CreatedAt, Some(period)),
        )?;
        let report = patient_visit_report(period, merge_records([by_visit, by_creation]));

        info!(
            total_visits = report.total_visits,
            patients = report.patient_summaries.len(),
            "Patient visit report computed"
        );
        Ok(report)
    }

    /// Billing-based and record-based service rankings
    ///
    /// # Arguments
    ///
    /// * `window` - Applied to bill creation and record visit dates; `None`
    ///   ranks everything
    /// * `limit` - Entries per ranking, default 10
    #[instrument(skip(self))]
    pub async fn top_services_report(
        &self,
        window: Option<DateWindow>,
        limit: Option<u32>,
    ) -> Result<TopServicesReport, ReportError> {
        let limit = resolve_limit(limit)?;
        let query = BillingQuery {
            window,
            ..BillingQuery::default()
        };
        let (billings, records) = tokio::try_join!(
            self.billings.find_billings(&query),
            self.records.find_records_by_date_range(RecordDateField::VisitDate, window),
        )?;

        let report = TopServicesReport {
            billing_based: rank_billed_services(&billings, limit)?,
            record_based: rank_recorded_services(&records, limit)?,
        };
        info!(
            billings = billings.len(),
            records = records.len(),
            "Top services report computed"
        );
        Ok(report)
    }

    /// Dashboard counters relative to the current clinic day
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ReportError> {
        self.dashboard_stats_at(Utc::now()).await
    }

    /// Dashboard counters relative to the clinic day containing `now`
    #[instrument(skip(self))]
    pub async fn dashboard_stats_at(&self, now: DateTime<Utc>) -> Result<DashboardStats, ReportError> {
        let start_of_today = self.timezone.start_of_today(now);
        let (total_patients, total_records_today, pending_payments, today_revenue) = tokio::try_join!(
            self.patients.count_patients(),
            self.records.count_records_since(start_of_today),
            self.billings.count_billings_by_status(PaymentStatus::Unpaid),
            self.billings.sum_paid_revenue_since(start_of_today),
        )?;

        Ok(DashboardStats {
            total_patients,
            total_records_today,
            pending_payments,
            today_revenue,
        })
    }

    /// The newest records with their patients
    #[instrument(skip(self))]
    pub async fn sample_records(&self, limit: Option<u32>) -> Result<SampleRecords, ReportError> {
        let limit = resolve_limit(limit)?;
        let samples = self.records.latest_records(limit as u32).await?;
        Ok(SampleRecords {
            count: samples.len(),
            samples,
        })
    }
}
