//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that keeps
//! the record invariants (non-negative prices).

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{BillingId, MedicalRecordId, Money, PatientId};
use domain_billing::{Billing, PaymentStatus, ServiceCharge};
use domain_records::{MedicalRecord, PrescriptionLine, ServiceLine};

/// Service names drawn from a small catalogue so rankings see repeats
pub const SERVICE_NAMES: [&str; 6] = [
    "Consultation",
    "Blood test",
    "X-Ray",
    "Ultrasound",
    "ECG",
    "Vaccination",
];

/// Strategy for non-negative amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Strategy for non-negative Money values
pub fn money_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(Money::from_minor)
}

pub fn payment_status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Unpaid),
        Just(PaymentStatus::Paid),
        Just(PaymentStatus::PartiallyPaid),
    ]
}

pub fn service_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(SERVICE_NAMES.to_vec()).prop_map(str::to_string)
}

/// Strategy for instants across 2024
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..366 * 24 * 60).prop_map(|minutes| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    })
}

pub fn service_line_strategy() -> impl Strategy<Value = ServiceLine> {
    (service_name_strategy(), money_strategy()).prop_map(|(name, price)| ServiceLine::new(name, price))
}

pub fn prescription_line_strategy() -> impl Strategy<Value = PrescriptionLine> {
    ("[A-Z][a-z]{3,10}", money_strategy(), 0u32..60)
        .prop_map(|(name, price, quantity)| PrescriptionLine::new(name, price, quantity))
}

/// Strategy for medical records with up to 8 lines of each kind
pub fn medical_record_strategy() -> impl Strategy<Value = MedicalRecord> {
    (
        prop::collection::vec(service_line_strategy(), 0..8),
        prop::collection::vec(prescription_line_strategy(), 0..8),
        prop::option::of(money_strategy()),
        instant_strategy(),
        instant_strategy(),
    )
        .prop_map(|(services, prescriptions, discount, visit_date, created_at)| {
            let mut record = MedicalRecord::new(PatientId::new(), visit_date, "Generated visit")
                .created_at(created_at);
            record.services = services;
            record.prescriptions = prescriptions;
            record.discount = discount;
            record
        })
}

pub fn service_charge_strategy() -> impl Strategy<Value = ServiceCharge> {
    (service_name_strategy(), money_strategy(), prop::option::of(1u32..5)).prop_map(
        |(service_name, price, quantity)| ServiceCharge {
            service_name,
            price,
            quantity,
        },
    )
}

/// Strategy for billing documents created across 2024
pub fn billing_strategy() -> impl Strategy<Value = Billing> {
    (
        prop::collection::vec(service_charge_strategy(), 0..6),
        money_strategy(),
        payment_status_strategy(),
        instant_strategy(),
    )
        .prop_map(|(service_charges, discount, payment_status, created_at)| {
            let lines = service_charges
                .iter()
                .map(ServiceCharge::line_total)
                .collect::<Result<Vec<_>, _>>()
                .expect("generated prices stay in range");
            let subtotal = Money::checked_sum(lines).expect("generated prices stay in range");
            Billing {
                id: BillingId::new(),
                medical_record_id: MedicalRecordId::new(),
                patient_id: PatientId::new(),
                service_charges,
                medicine_charges: Vec::new(),
                subtotal,
                discount,
                total_amount: subtotal.checked_sub(&discount).expect("generated prices stay in range"),
                payment_status,
                payment_method: None,
                paid_date: None,
                created_at,
                updated_at: created_at,
            }
        })
}
