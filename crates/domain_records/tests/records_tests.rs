//! Document-shape tests for domain_records

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Money, PatientId};
use domain_records::{
    MedicalRecord, Patient, PatientCategory, PrescriptionLine, RecordDateField, RecordStatus,
    RecordWithPatient, ServiceLine, UNSPECIFIED_CATEGORY,
};

fn sample_record() -> MedicalRecord {
    MedicalRecord::new(
        PatientId::new(),
        Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
        "Sore throat",
    )
    .with_service(ServiceLine::new("Consultation", Money::new(dec!(100))))
    .with_service(ServiceLine::new("Throat swab", Money::new(dec!(50))))
    .with_prescription(
        PrescriptionLine::new("Amoxicillin", Money::new(dec!(10)), 3)
            .with_unit("capsule")
            .with_dosage("1 capsule, 3 times a day"),
    )
    .with_discount(Money::new(dec!(20)))
}

mod document_shape {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(sample_record()).unwrap();

        assert!(json.get("patientId").is_some());
        assert!(json.get("visitDate").is_some());
        assert_eq!(json["services"][0]["serviceName"], "Consultation");
        assert_eq!(json["prescriptions"][0]["medicineName"], "Amoxicillin");
        assert_eq!(json["discount"], serde_json::json!(20.0));
        assert_eq!(json["status"], "InProgress");
    }

    #[test]
    fn test_record_without_optional_fields_deserializes() {
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "patientId": uuid::Uuid::new_v4(),
            "visitDate": "2024-05-02T08:00:00Z",
            "symptoms": "Dizziness",
            "createdAt": "2024-05-02T08:00:00Z",
            "updatedAt": "2024-05-02T08:00:00Z"
        });

        let record: MedicalRecord = serde_json::from_value(json).unwrap();
        assert!(record.services.is_empty());
        assert!(record.prescriptions.is_empty());
        assert!(record.discount.is_none());
        assert_eq!(record.status, RecordStatus::InProgress);
    }

    #[test]
    fn test_record_with_patient_flattens_record() {
        let patient = Patient::new("Pham Thi D")
            .with_phone("0901234567")
            .with_category(PatientCategory::Vip);
        let mut record = sample_record();
        record.patient_id = patient.id;

        let joined = RecordWithPatient {
            record,
            patient: Some(patient.summary()),
        };
        let json = serde_json::to_value(&joined).unwrap();

        assert_eq!(json["symptoms"], "Sore throat");
        assert_eq!(json["patient"]["name"], "Pham Thi D");
        assert_eq!(json["patient"]["category"], "VIP");
    }
}

mod invariants {
    use super::*;

    #[test]
    fn test_sample_record_is_valid() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_negative_prescription_price_is_rejected() {
        let record = sample_record()
            .with_prescription(PrescriptionLine::new("Refund", Money::new(dec!(-3)), 1));
        let err = record.validate().unwrap_err();
        assert_eq!(err.field(), "prescriptions");
    }

    #[test]
    fn test_status_changes() {
        let mut record = sample_record();
        record.complete();
        assert_eq!(record.status, RecordStatus::Completed);
        record.cancel();
        assert_eq!(record.status, RecordStatus::Cancelled);
    }
}

mod date_fields {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_date_field_selects_timestamp() {
        let visit = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let stored = visit + Duration::days(3);
        let record = MedicalRecord::new(PatientId::new(), visit, "Back pain").created_at(stored);

        assert_eq!(RecordDateField::VisitDate.of(&record), visit);
        assert_eq!(RecordDateField::CreatedAt.of(&record), stored);
        assert_eq!(RecordDateField::VisitDate.column(), "visit_date");
    }

    #[test]
    fn test_unspecified_category_label() {
        assert_eq!(PatientCategory::label_or_unspecified(None), UNSPECIFIED_CATEGORY);
        assert_eq!(PatientCategory::label_or_unspecified(Some(PatientCategory::Insured)), "Insured");
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn category_strategy() -> impl Strategy<Value = PatientCategory> {
        prop::sample::select(vec![
            PatientCategory::Standard,
            PatientCategory::Insured,
            PatientCategory::Vip,
        ])
    }

    proptest! {
        #[test]
        fn prescription_total_is_price_times_quantity(minor in 0i64..10_000_000, quantity in 0u32..1_000) {
            let line = PrescriptionLine::new("Paracetamol", Money::from_minor(minor), quantity);
            prop_assert_eq!(
                line.line_total().unwrap().amount(),
                Decimal::new(minor, 2) * Decimal::from(quantity)
            );
        }

        #[test]
        fn category_label_parses_in_any_case(category in category_strategy(), upper in any::<bool>()) {
            let label = if upper {
                category.label().to_uppercase()
            } else {
                category.label().to_lowercase()
            };
            prop_assert_eq!(label.parse::<PatientCategory>(), Ok(category));
        }
    }
}
