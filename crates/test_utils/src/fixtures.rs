//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the clinic domain. Instants are
//! fixed so window tests stay predictable.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{DateWindow, Money, PatientId};
use domain_records::{MedicalRecord, Patient, PatientCategory, PrescriptionLine, ServiceLine};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard consultation fee
    pub fn consultation() -> Money {
        Money::new(dec!(100))
    }

    /// Blood test fee
    pub fn blood_test() -> Money {
        Money::new(dec!(50))
    }

    /// Unit price of a common medicine
    pub fn tablet() -> Money {
        Money::new(dec!(10))
    }

    pub fn discount() -> Money {
        Money::new(dec!(20))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// First instant of the January 2024 reporting window
    pub fn january_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Last instant of the January 2024 reporting window
    pub fn january_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()
    }

    pub fn mid_january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    /// Inside December 2023, before the window
    pub fn before_january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 20, 9, 0, 0).unwrap()
    }

    /// Inside February 2024, after the window
    pub fn after_january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    pub fn january_window() -> DateWindow {
        DateWindow::new(Self::january_start(), Self::january_end()).unwrap()
    }
}

/// Fixture for patients
pub struct PatientFixtures;

impl PatientFixtures {
    /// A patient with a generated name and phone number
    pub fn random() -> Patient {
        Patient::new(Name().fake::<String>()).with_phone(PhoneNumber().fake::<String>())
    }

    pub fn with_category(category: PatientCategory) -> Patient {
        Self::random().with_category(category)
    }

    /// A patient registered before categories were recorded
    pub fn uncategorized() -> Patient {
        Self::random()
    }
}

/// Fixture for medical records
pub struct RecordFixtures;

impl RecordFixtures {
    /// Services A=100 and B=50, medicine M at 10 × 3, record discount 20
    ///
    /// Bills to subtotal 180 and total 160.
    pub fn worked_example(patient_id: PatientId) -> MedicalRecord {
        MedicalRecord::new(patient_id, TemporalFixtures::mid_january(), "Fever and sore throat")
            .created_at(TemporalFixtures::mid_january())
            .with_service(ServiceLine::new("A", MoneyFixtures::consultation()))
            .with_service(ServiceLine::new("B", MoneyFixtures::blood_test()))
            .with_prescription(PrescriptionLine::new("M", MoneyFixtures::tablet(), 3).with_unit("tablet"))
            .with_discount(MoneyFixtures::discount())
    }
}
