//! Billing documents
//!
//! A billing is the monetized snapshot of one medical record: its service
//! and prescription lines are copied as charge lines when the bill is
//! created and never follow later edits to the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BillingId, MedicalRecordId, Money, MoneyError, PatientId};

/// Payment state of a bill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Nothing paid yet
    #[default]
    Unpaid,
    /// Fully settled
    Paid,
    /// Some amount received
    PartiallyPaid,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Unpaid,
        PaymentStatus::Paid,
        PaymentStatus::PartiallyPaid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::PartiallyPaid => "PartiallyPaid",
        }
    }

    /// Checks the documented transition table
    ///
    /// `Unpaid -> {PartiallyPaid, Paid}`, `PartiallyPaid -> Paid`. Staying in
    /// the same status is always allowed.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Unpaid, Unpaid)
                | (Paid, Paid)
                | (PartiallyPaid, PartiallyPaid)
                | (Unpaid, PartiallyPaid)
                | (Unpaid, Paid)
                | (PartiallyPaid, Paid)
        )
    }

    /// True when money has been received
    pub fn has_payment(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::PartiallyPaid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!("invalid payment status '{s}', expected one of Unpaid, Paid, PartiallyPaid")
            })
    }
}

/// A billed service, copied from a record's service line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCharge {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub price: Money,
    /// Missing on older documents, where it means one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl ServiceCharge {
    pub fn new(service_name: impl Into<String>, price: Money) -> Self {
        Self {
            service_name: service_name.into(),
            price,
            quantity: Some(1),
        }
    }

    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.price.checked_times(self.effective_quantity())
    }
}

/// A billed medicine, copied from a record's prescription line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineCharge {
    #[serde(default)]
    pub medicine_name: String,
    /// Unit price
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub quantity: u32,
}

impl MedicineCharge {
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.price.checked_times(self.quantity)
    }
}

/// A bill derived from one medical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub id: BillingId,
    pub medical_record_id: MedicalRecordId,
    pub patient_id: PatientId,
    pub service_charges: Vec<ServiceCharge>,
    pub medicine_charges: Vec<MedicineCharge>,
    pub subtotal: Money,
    pub discount: Money,
    /// `subtotal - discount`; negative when the discount exceeds the subtotal
    pub total_amount: Money,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Billing {
    /// Sum of all charge lines, recomputed from the snapshot
    pub fn charges_total(&self) -> Result<Money, MoneyError> {
        let services = self
            .service_charges
            .iter()
            .map(ServiceCharge::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        let medicines = self
            .medicine_charges
            .iter()
            .map(MedicineCharge::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::checked_sum(services.into_iter().chain(medicines))
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Payment fields applied by an update
///
/// `payment_method: None` keeps the stored method. `paid_date` is written
/// as given, so `None` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPatch {
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub paid_date: Option<DateTime<Utc>>,
}

impl BillingPatch {
    /// Applies the patch to a document in memory
    pub fn apply(&self, billing: &mut Billing, now: DateTime<Utc>) {
        billing.payment_status = self.payment_status;
        if let Some(method) = &self.payment_method {
            billing.payment_method = Some(method.clone());
        }
        billing.paid_date = self.paid_date;
        billing.updated_at = now;
    }
}
