//! Billing service
//!
//! Orchestrates the record and billing stores around the pure derivation:
//! fetch the record, derive the bill in memory, write it once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use core_kernel::BillingId;
use domain_records::RecordPort;

use crate::billing::{Billing, BillingPatch, PaymentStatus};
use crate::derivation::{derive_billing, CreateBilling};
use crate::error::BillingError;
use crate::ports::{BillingPort, BillingQuery};

/// Request to change a bill's payment state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub paid_date: Option<DateTime<Utc>>,
}

impl PaymentUpdate {
    pub fn new(payment_status: PaymentStatus) -> Self {
        Self {
            payment_status,
            payment_method: None,
            paid_date: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn paid_on(mut self, paid_date: DateTime<Utc>) -> Self {
        self.paid_date = Some(paid_date);
        self
    }

    /// Resolves the stored fields: a supplied paid date is kept, otherwise
    /// it is `now` when money was received and cleared when unpaid
    pub fn into_patch(self, now: DateTime<Utc>) -> BillingPatch {
        let paid_date = self
            .paid_date
            .or_else(|| self.payment_status.has_payment().then_some(now));
        BillingPatch {
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            paid_date,
        }
    }
}

/// Application service for bills
pub struct BillingService {
    records: Arc<dyn RecordPort>,
    billings: Arc<dyn BillingPort>,
    strict_transitions: bool,
}

impl BillingService {
    /// Creates a service with permissive payment transitions
    pub fn new(records: Arc<dyn RecordPort>, billings: Arc<dyn BillingPort>) -> Self {
        Self {
            records,
            billings,
            strict_transitions: false,
        }
    }

    /// Rejects payment changes outside the transition table when enabled
    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }

    /// Derives a bill from a medical record and stores it
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` when the record does not exist
    /// - `Validation` when the record or discount breaks a constraint
    /// - `Store` when a store call fails
    #[instrument(skip(self, request), fields(medical_record_id = %request.medical_record_id))]
    pub async fn create_billing(&self, request: CreateBilling) -> Result<Billing, BillingError> {
        let record = self.records.get_record(request.medical_record_id).await?;
        let billing = derive_billing(&record, &request, Utc::now())?;

        let existing = self
            .billings
            .find_billings(&BillingQuery::new().for_record(record.id))
            .await?;
        if !existing.is_empty() {
            warn!(
                medical_record_id = %record.id,
                existing = existing.len(),
                "Medical record already has a billing; creating another"
            );
        }

        let stored = self.billings.insert_billing(&billing).await?;
        info!(
            billing_id = %stored.id,
            subtotal = %stored.subtotal,
            discount = %stored.discount,
            total_amount = %stored.total_amount,
            payment_status = %stored.payment_status,
            "Billing created"
        );
        Ok(stored)
    }

    /// Changes the payment state of a bill
    ///
    /// Transitions outside the table are logged and applied, or rejected
    /// with `InvalidStatusTransition` in strict mode.
    #[instrument(skip(self, update), fields(billing_id = %id, to = %update.payment_status))]
    pub async fn update_payment_status(
        &self,
        id: BillingId,
        update: PaymentUpdate,
    ) -> Result<Billing, BillingError> {
        let current = self.billings.get_billing(id).await?;
        let from = current.payment_status;
        let to = update.payment_status;

        if !from.can_transition_to(to) {
            if self.strict_transitions {
                return Err(BillingError::InvalidStatusTransition { from, to });
            }
            warn!(%from, %to, "Payment status change outside the transition table");
        }

        let updated = self
            .billings
            .update_billing(id, &update.into_patch(Utc::now()))
            .await?;
        info!(%from, %to, paid_date = ?updated.paid_date, "Payment status updated");
        Ok(updated)
    }

    /// Gets a bill by id
    #[instrument(skip(self))]
    pub async fn get_billing(&self, id: BillingId) -> Result<Billing, BillingError> {
        Ok(self.billings.get_billing(id).await?)
    }

    /// Lists bills matching the query, newest first
    #[instrument(skip(self))]
    pub async fn list_billings(&self, query: BillingQuery) -> Result<Vec<Billing>, BillingError> {
        let billings = self.billings.find_billings(&query).await?;
        info!(count = billings.len(), "Listed billings");
        Ok(billings)
    }
}
