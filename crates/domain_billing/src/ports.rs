//! Billing Store Port
//!
//! Persistence seam for billing documents. The PostgreSQL adapter lives in
//! `infra_db`; [`mock::MockBillingPort`] keeps documents in memory for
//! service, report and API tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{BillingId, DateWindow, DomainPort, HealthCheckable, MedicalRecordId, Money, PortError};

use crate::billing::{Billing, BillingPatch, PaymentStatus};
use crate::error::BillingError;

/// Filters for finding billings
///
/// Every filter that is `None` is ignored. Results are newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillingQuery {
    /// Inclusive window on `created_at`
    pub window: Option<DateWindow>,
    pub payment_status: Option<PaymentStatus>,
    pub medical_record_id: Option<MedicalRecordId>,
}

impl BillingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from optional bounds; the window applies only when
    /// both bounds are given
    pub fn from_bounds(
        payment_status: Option<PaymentStatus>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, BillingError> {
        let window = match (start, end) {
            (Some(start), Some(end)) => Some(
                DateWindow::new(start, end)
                    .map_err(|e| BillingError::invalid_argument(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(Self {
            window,
            payment_status,
            medical_record_id: None,
        })
    }

    pub fn in_window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn for_record(mut self, medical_record_id: MedicalRecordId) -> Self {
        self.medical_record_id = Some(medical_record_id);
        self
    }

    /// Evaluates the filters against a document
    pub fn matches(&self, billing: &Billing) -> bool {
        self.window.map_or(true, |w| w.contains(billing.created_at))
            && self.payment_status.map_or(true, |s| billing.payment_status == s)
            && self.medical_record_id.map_or(true, |id| billing.medical_record_id == id)
    }
}

/// Port for the Billing Store
#[async_trait]
pub trait BillingPort: DomainPort + HealthCheckable {
    /// Inserts a fully computed billing document
    async fn insert_billing(&self, billing: &Billing) -> Result<Billing, PortError>;

    /// Gets a billing by id, or `PortError::NotFound`
    async fn get_billing(&self, id: BillingId) -> Result<Billing, PortError>;

    /// Finds billings matching the query, newest first
    async fn find_billings(&self, query: &BillingQuery) -> Result<Vec<Billing>, PortError>;

    /// Applies payment fields to a billing and returns the updated document
    async fn update_billing(&self, id: BillingId, patch: &BillingPatch) -> Result<Billing, PortError>;

    /// Counts billings in the given payment status
    async fn count_billings_by_status(&self, status: PaymentStatus) -> Result<u64, PortError>;

    /// Sums `total_amount` of paid billings created at or after `since`
    async fn sum_paid_revenue_since(&self, since: DateTime<Utc>) -> Result<Money, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory mock implementation of BillingPort
    #[derive(Debug, Default)]
    pub struct MockBillingPort {
        billings: Arc<RwLock<HashMap<BillingId, Billing>>>,
        unavailable: AtomicBool,
    }

    impl MockBillingPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with billings for testing
        pub async fn with_billings(billings: Vec<Billing>) -> Self {
            let port = Self::new();
            for billing in billings {
                port.billings.write().await.insert(billing.id, billing);
            }
            port
        }

        /// Number of stored documents
        pub async fn len(&self) -> usize {
            self.billings.read().await.len()
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock billing store unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockBillingPort {}

    #[async_trait]
    impl HealthCheckable for MockBillingPort {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.unavailable.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult {
                adapter_id: "mock-billing-port".to_string(),
                status,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillingPort for MockBillingPort {
        async fn insert_billing(&self, billing: &Billing) -> Result<Billing, PortError> {
            self.check_available()?;
            let mut billings = self.billings.write().await;
            if billings.contains_key(&billing.id) {
                return Err(PortError::Conflict {
                    message: format!("Billing {} already exists", billing.id),
                });
            }
            billings.insert(billing.id, billing.clone());
            Ok(billing.clone())
        }

        async fn get_billing(&self, id: BillingId) -> Result<Billing, PortError> {
            self.check_available()?;
            self.billings
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Billing", id))
        }

        async fn find_billings(&self, query: &BillingQuery) -> Result<Vec<Billing>, PortError> {
            self.check_available()?;
            let billings = self.billings.read().await;
            let mut found: Vec<Billing> = billings.values().filter(|b| query.matches(b)).cloned().collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
            Ok(found)
        }

        async fn update_billing(&self, id: BillingId, patch: &BillingPatch) -> Result<Billing, PortError> {
            self.check_available()?;
            let mut billings = self.billings.write().await;
            let billing = billings
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Billing", id))?;
            patch.apply(billing, Utc::now());
            Ok(billing.clone())
        }

        async fn count_billings_by_status(&self, status: PaymentStatus) -> Result<u64, PortError> {
            self.check_available()?;
            let billings = self.billings.read().await;
            Ok(billings.values().filter(|b| b.payment_status == status).count() as u64)
        }

        async fn sum_paid_revenue_since(&self, since: DateTime<Utc>) -> Result<Money, PortError> {
            self.check_available()?;
            let billings = self.billings.read().await;
            Money::checked_sum(
                billings
                    .values()
                    .filter(|b| b.is_paid() && b.created_at >= since)
                    .map(|b| b.total_amount),
            )
            .map_err(|e| PortError::internal(e.to_string()))
        }
    }
}
