//! Derivation and payment-state tests for domain_billing

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Money, PatientId};
use domain_billing::{
    derive_billing, resolve_discount, BillingPatch, CreateBilling, PaymentStatus, PaymentUpdate,
};
use domain_records::{MedicalRecord, PrescriptionLine, ServiceLine};

fn money_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000).prop_map(Money::from_minor)
}

fn record_strategy() -> impl Strategy<Value = MedicalRecord> {
    (
        prop::collection::vec(money_strategy(), 0..8),
        prop::collection::vec((money_strategy(), 0u32..50), 0..8),
    )
        .prop_map(|(services, prescriptions)| {
            let mut record = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup");
            for (i, price) in services.into_iter().enumerate() {
                record = record.with_service(ServiceLine::new(format!("Service {i}"), price));
            }
            for (i, (price, quantity)) in prescriptions.into_iter().enumerate() {
                record = record.with_prescription(PrescriptionLine::new(format!("Medicine {i}"), price, quantity));
            }
            record
        })
}

mod derivation {
    use super::*;

    proptest! {
        #[test]
        fn subtotal_is_services_plus_prescriptions(record in record_strategy()) {
            let billing = derive_billing(&record, &CreateBilling::for_record(record.id), Utc::now()).unwrap();

            let services: Decimal = record.services.iter().map(|s| s.price.amount()).sum();
            let medicines: Decimal = record
                .prescriptions
                .iter()
                .map(|p| p.price.amount() * Decimal::from(p.quantity))
                .sum();

            prop_assert_eq!(billing.subtotal.amount(), services + medicines);
            prop_assert_eq!(billing.charges_total().unwrap(), billing.subtotal);
        }

        #[test]
        fn total_is_subtotal_minus_discount(record in record_strategy(), discount in money_strategy()) {
            let request = CreateBilling::for_record(record.id).with_discount(discount);
            let billing = derive_billing(&record, &request, Utc::now()).unwrap();

            prop_assert_eq!(billing.total_amount, billing.subtotal.checked_sub(&discount).unwrap());
            prop_assert_eq!(billing.total_amount.is_negative(), discount > billing.subtotal);
        }

        #[test]
        fn charge_lines_mirror_record_lines(record in record_strategy()) {
            let billing = derive_billing(&record, &CreateBilling::for_record(record.id), Utc::now()).unwrap();

            prop_assert_eq!(billing.service_charges.len(), record.services.len());
            prop_assert_eq!(billing.medicine_charges.len(), record.prescriptions.len());
            for (charge, line) in billing.medicine_charges.iter().zip(&record.prescriptions) {
                prop_assert_eq!(&charge.medicine_name, &line.medicine_name);
                prop_assert_eq!(charge.quantity, line.quantity);
            }
        }
    }

    #[test]
    fn test_record_discount_zero_means_total_equals_subtotal() {
        let record = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup")
            .with_service(ServiceLine::new("Consultation", Money::new(dec!(120))))
            .with_discount(Money::zero());
        let billing = derive_billing(&record, &CreateBilling::for_record(record.id), Utc::now()).unwrap();

        assert_eq!(billing.total_amount, billing.subtotal);
    }

    #[test]
    fn test_discount_resolution_order() {
        let record = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup")
            .with_discount(Money::new(dec!(15)));

        assert_eq!(resolve_discount(Some(Money::new(dec!(5))), &record).amount(), dec!(5));
        assert_eq!(resolve_discount(None, &record).amount(), dec!(15));

        let bare = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup");
        assert!(resolve_discount(None, &bare).is_zero());
    }

    #[test]
    fn test_record_with_negative_price_is_rejected() {
        let record = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup")
            .with_service(ServiceLine::new("Broken", Money::new(dec!(-10))));
        assert!(derive_billing(&record, &CreateBilling::for_record(record.id), Utc::now()).is_err());
    }
}

mod payment {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unpaid_update_clears_paid_date() {
        let patch = PaymentUpdate::new(PaymentStatus::Unpaid).into_patch(Utc::now());
        assert_eq!(patch.paid_date, None);
        assert_eq!(patch.payment_method, None);
    }

    #[test]
    fn test_paid_update_defaults_paid_date_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let patch = PaymentUpdate::new(PaymentStatus::Paid).into_patch(now);
        assert_eq!(patch.paid_date, Some(now));
    }

    #[test]
    fn test_patch_keeps_method_when_absent() {
        let record = MedicalRecord::new(PatientId::new(), Utc::now(), "Checkup");
        let request = CreateBilling::for_record(record.id)
            .with_payment(PaymentStatus::PartiallyPaid, Some("Cash".to_string()));
        let mut billing = derive_billing(&record, &request, Utc::now()).unwrap();

        let patch = BillingPatch {
            payment_status: PaymentStatus::Paid,
            payment_method: None,
            paid_date: None,
        };
        patch.apply(&mut billing, Utc::now());

        assert_eq!(billing.payment_status, PaymentStatus::Paid);
        assert_eq!(billing.payment_method.as_deref(), Some("Cash"));
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&PaymentStatus::PartiallyPaid).unwrap();
        assert_eq!(json, "\"PartiallyPaid\"");
    }
}
