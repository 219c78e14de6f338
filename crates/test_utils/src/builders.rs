//! Test Data Builders
//!
//! Builder patterns for constructing records and billings with sensible
//! defaults, so tests only spell out the fields they are about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use core_kernel::{BillingId, MedicalRecordId, Money, PatientId};
use domain_billing::{Billing, MedicineCharge, PaymentStatus, ServiceCharge};
use domain_records::{MedicalRecord, PrescriptionLine, ServiceLine};

use crate::fixtures::TemporalFixtures;

/// Builder for medical records
pub struct MedicalRecordBuilder {
    patient_id: PatientId,
    visit_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    symptoms: String,
    services: Vec<ServiceLine>,
    prescriptions: Vec<PrescriptionLine>,
    discount: Option<Money>,
}

impl Default for MedicalRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicalRecordBuilder {
    /// Creates a builder for a mid-January visit stored the same day
    pub fn new() -> Self {
        Self {
            patient_id: PatientId::new(),
            visit_date: TemporalFixtures::mid_january(),
            created_at: TemporalFixtures::mid_january(),
            symptoms: "Routine checkup".to_string(),
            services: Vec::new(),
            prescriptions: Vec::new(),
            discount: None,
        }
    }

    pub fn for_patient(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn visited_at(mut self, visit_date: DateTime<Utc>) -> Self {
        self.visit_date = visit_date;
        self
    }

    pub fn stored_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = symptoms.into();
        self
    }

    /// Adds a service line
    pub fn service(mut self, name: &str, price: Decimal) -> Self {
        self.services.push(ServiceLine::new(name, Money::new(price)));
        self
    }

    /// Adds a prescription line
    pub fn prescription(mut self, name: &str, price: Decimal, quantity: u32) -> Self {
        self.prescriptions.push(PrescriptionLine::new(name, Money::new(price), quantity));
        self
    }

    pub fn discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(Money::new(discount));
        self
    }

    pub fn build(self) -> MedicalRecord {
        let mut record = MedicalRecord::new(self.patient_id, self.visit_date, self.symptoms)
            .created_at(self.created_at);
        record.services = self.services;
        record.prescriptions = self.prescriptions;
        record.discount = self.discount;
        record
    }
}

/// Builder for billing documents
///
/// Totals are computed from the charge lines unless `total` is set, which
/// lets report tests pin exact amounts.
pub struct BillingBuilder {
    medical_record_id: MedicalRecordId,
    patient_id: PatientId,
    service_charges: Vec<ServiceCharge>,
    medicine_charges: Vec<MedicineCharge>,
    discount: Money,
    total: Option<Money>,
    payment_status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl Default for BillingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingBuilder {
    pub fn new() -> Self {
        Self {
            medical_record_id: MedicalRecordId::new(),
            patient_id: PatientId::new(),
            service_charges: Vec::new(),
            medicine_charges: Vec::new(),
            discount: Money::zero(),
            total: None,
            payment_status: PaymentStatus::Unpaid,
            created_at: TemporalFixtures::mid_january(),
        }
    }

    pub fn for_record(mut self, record: &MedicalRecord) -> Self {
        self.medical_record_id = record.id;
        self.patient_id = record.patient_id;
        self
    }

    /// Adds a service charge with quantity 1
    pub fn service(mut self, name: &str, price: Decimal) -> Self {
        self.service_charges.push(ServiceCharge::new(name, Money::new(price)));
        self
    }

    /// Adds a service charge with an explicit quantity, or none for legacy documents
    pub fn service_with_quantity(mut self, name: &str, price: Decimal, quantity: Option<u32>) -> Self {
        self.service_charges.push(ServiceCharge {
            service_name: name.to_string(),
            price: Money::new(price),
            quantity,
        });
        self
    }

    pub fn medicine(mut self, name: &str, price: Decimal, quantity: u32) -> Self {
        self.medicine_charges.push(MedicineCharge {
            medicine_name: name.to_string(),
            price: Money::new(price),
            quantity,
        });
        self
    }

    pub fn discount(mut self, discount: Decimal) -> Self {
        self.discount = Money::new(discount);
        self
    }

    /// Pins the total amount
    pub fn total(mut self, total: Decimal) -> Self {
        self.total = Some(Money::new(total));
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    pub fn paid(self) -> Self {
        self.status(PaymentStatus::Paid)
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(self) -> Billing {
        let lines = self
            .service_charges
            .iter()
            .map(ServiceCharge::line_total)
            .chain(self.medicine_charges.iter().map(MedicineCharge::line_total))
            .collect::<Result<Vec<_>, _>>()
            .expect("builder prices stay in range");
        let subtotal = Money::checked_sum(lines).expect("builder prices stay in range");
        let total_amount = self.total.unwrap_or_else(|| {
            subtotal
                .checked_sub(&self.discount)
                .expect("builder prices stay in range")
        });
        let paid_date = self.payment_status.has_payment().then_some(self.created_at);

        Billing {
            id: BillingId::new_v7(),
            medical_record_id: self.medical_record_id,
            patient_id: self.patient_id,
            service_charges: self.service_charges,
            medicine_charges: self.medicine_charges,
            subtotal,
            discount: self.discount,
            total_amount,
            payment_status: self.payment_status,
            payment_method: None,
            paid_date,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
