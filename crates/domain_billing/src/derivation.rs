//! Billing derivation
//!
//! Turns a medical record into a fully computed bill in memory. Nothing is
//! persisted here; the service writes the finished document in one call.
//!
//! ```text
//! subtotal     = Σ service.price + Σ (prescription.price × prescription.quantity)
//! discount     = override ?? record.discount ?? 0
//! total_amount = subtotal − discount            (not floored at zero)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillingId, MedicalRecordId, Money};
use domain_records::MedicalRecord;

use crate::billing::{Billing, MedicineCharge, PaymentStatus, ServiceCharge};
use crate::error::BillingError;

/// Input for creating a bill from a medical record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBilling {
    pub medical_record_id: MedicalRecordId,
    /// Replaces the record's discount when present, including an explicit zero
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl CreateBilling {
    pub fn for_record(medical_record_id: MedicalRecordId) -> Self {
        Self {
            medical_record_id,
            discount: None,
            payment_status: None,
            payment_method: None,
        }
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_payment(mut self, status: PaymentStatus, method: Option<String>) -> Self {
        self.payment_status = Some(status);
        self.payment_method = method;
        self
    }
}

/// Resolves the discount to apply: override, then record, then zero
pub fn resolve_discount(override_discount: Option<Money>, record: &MedicalRecord) -> Money {
    override_discount.or(record.discount).unwrap_or_default()
}

/// Derives a bill from a medical record
///
/// # Arguments
///
/// * `record` - The source record; its lines are copied, never mutated
/// * `request` - Discount override and initial payment fields
/// * `now` - Creation timestamp for the new document
///
/// # Returns
///
/// The complete bill, ready to insert
///
/// # Errors
///
/// `Validation` when the record holds a negative price or discount, the
/// override discount is negative, or the amounts are out of range
pub fn derive_billing(
    record: &MedicalRecord,
    request: &CreateBilling,
    now: DateTime<Utc>,
) -> Result<Billing, BillingError> {
    record.validate()?;
    if request.discount.is_some_and(|d| d.is_negative()) {
        return Err(BillingError::Validation {
            message: "Discount must not be negative".to_string(),
            field: Some("discount".to_string()),
        });
    }

    let service_charges: Vec<ServiceCharge> = record
        .services
        .iter()
        .map(|line| ServiceCharge::new(line.service_name.clone(), line.price))
        .collect();

    let medicine_charges: Vec<MedicineCharge> = record
        .prescriptions
        .iter()
        .map(|line| MedicineCharge {
            medicine_name: line.medicine_name.clone(),
            price: line.price,
            quantity: line.quantity,
        })
        .collect();

    let service_total = Money::checked_sum(record.services.iter().map(|s| s.price))?;
    let medicine_lines = record
        .prescriptions
        .iter()
        .map(|p| p.line_total())
        .collect::<Result<Vec<_>, _>>()?;
    let subtotal = service_total.checked_add(&Money::checked_sum(medicine_lines)?)?;
    let discount = resolve_discount(request.discount, record);
    let total_amount = subtotal.checked_sub(&discount)?;
    let payment_status = request.payment_status.unwrap_or_default();

    Ok(Billing {
        id: BillingId::new_v7(),
        medical_record_id: record.id,
        patient_id: record.patient_id,
        service_charges,
        medicine_charges,
        subtotal,
        discount,
        total_amount,
        payment_status,
        payment_method: request.payment_method.clone(),
        paid_date: None,
        created_at: now,
        updated_at: now,
    })
}
