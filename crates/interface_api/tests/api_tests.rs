//! HTTP tests for interface_api
//!
//! Drives the router in-process against the in-memory stores.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use domain_billing::ports::mock::MockBillingPort;
use domain_billing::{Billing, BillingPort};
use domain_records::ports::mock::MockRecordPort;
use domain_records::{MedicalRecord, PatientCategory};
use interface_api::auth::{create_token, roles};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState, Stores};
use test_utils::{BillingBuilder, MedicalRecordBuilder, PatientFixtures, RecordFixtures};

struct TestApp {
    router: Router,
    records: Arc<MockRecordPort>,
    billings: Arc<MockBillingPort>,
    config: ApiConfig,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    fn with_config(config: ApiConfig) -> Self {
        let records = Arc::new(MockRecordPort::new());
        let billings = Arc::new(MockBillingPort::new());
        let stores = Stores {
            records: records.clone(),
            patients: records.clone(),
            billings: billings.clone(),
        };
        let state = AppState::new(stores, config.clone()).unwrap();

        Self {
            router: create_router(state),
            records,
            billings,
            config,
        }
    }

    fn token(&self, role: &str) -> String {
        create_token("user-1", vec![role.to_string()], &self.config.jwt_secret, 300).unwrap()
    }

    /// Stores a patient and their worked-example visit
    async fn seed_record(&self) -> MedicalRecord {
        let patient = PatientFixtures::with_category(PatientCategory::Insured);
        let record = RecordFixtures::worked_example(patient.id);
        self.records.insert_patient(patient).await;
        self.records.insert_record(record.clone()).await;
        record
    }

    async fn seed_billing(&self, billing: Billing) -> Billing {
        self.billings.insert_billing(&billing).await.unwrap()
    }

    async fn send(&self, method: Method, uri: &str, role: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(role)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(roles::DOCTOR), None).await
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness_is_public() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_every_store() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adapters"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_a_store_is_down() {
        let app = TestApp::new();
        app.billings.set_unavailable(true);
        let (status, body) = app.send(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/api/v1/billing", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let app = TestApp::new();
        let token = create_token("user-1", vec![roles::ADMIN.to_string()], "not-the-secret", 300).unwrap();
        let request = Request::builder()
            .uri("/api/v1/reports/dashboard")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_doctor_cannot_create_billing() {
        let app = TestApp::new();
        let record = app.seed_record().await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::DOCTOR),
                Some(json!({ "medicalRecordId": record.id.as_uuid().to_string() })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
        assert_eq!(app.billings.len().await, 0);
    }
}

mod billing {
    use super::*;

    #[tokio::test]
    async fn test_create_billing_from_worked_example() {
        let app = TestApp::new();
        let record = app.seed_record().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ACCOUNTANT),
                Some(json!({ "medicalRecordId": record.id.as_uuid().to_string() })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["subtotal"].as_f64(), Some(180.0));
        assert_eq!(data["discount"].as_f64(), Some(20.0));
        assert_eq!(data["totalAmount"].as_f64(), Some(160.0));
        assert_eq!(data["paymentStatus"], "Unpaid");
        assert_eq!(data["serviceCharges"].as_array().unwrap().len(), 2);
        assert_eq!(data["medicineCharges"][0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_explicit_zero_discount_overrides_record() {
        let app = TestApp::new();
        let record = app.seed_record().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ADMIN),
                Some(json!({ "medicalRecordId": record.id.as_uuid().to_string(), "discount": 0 })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["totalAmount"].as_f64(), Some(180.0));
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let app = TestApp::new();
        let missing = MedicalRecordBuilder::new().build();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ACCOUNTANT),
                Some(json!({ "medicalRecordId": missing.id.as_uuid().to_string() })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_record_id_is_bad_request() {
        let app = TestApp::new();
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ACCOUNTANT),
                Some(json!({ "medicalRecordId": "not-a-uuid" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_record_id_is_validation_error() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Method::POST, "/api/v1/billing", Some(roles::ACCOUNTANT), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_negative_discount_is_validation_error() {
        let app = TestApp::new();
        let record = app.seed_record().await;
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ACCOUNTANT),
                Some(json!({ "medicalRecordId": record.id.as_uuid().to_string(), "discount": -5 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_out_of_range_record_prices_are_validation_error() {
        let app = TestApp::new();
        let huge = rust_decimal::Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let record = MedicalRecordBuilder::new()
            .service("Surgery", huge)
            .service("Implant", huge)
            .build();
        app.records.insert_record(record.clone()).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/billing",
                Some(roles::ACCOUNTANT),
                Some(json!({ "medicalRecordId": record.id.as_uuid().to_string() })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(app.billings.len().await, 0);
    }

    #[tokio::test]
    async fn test_get_and_list_billings() {
        let app = TestApp::new();
        let record = app.seed_record().await;
        let billing = app
            .seed_billing(BillingBuilder::new().for_record(&record).service("A", dec!(100)).build())
            .await;

        let (status, body) = app
            .get(&format!("/api/v1/billing/{}", billing.id.as_uuid()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["medicalRecordId"], record.id.as_uuid().to_string());

        let (status, body) = app.get("/api/v1/billing?paymentStatus=Unpaid").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = app.get("/api/v1/billing?paymentStatus=Paid").await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_bad_request() {
        let app = TestApp::new();
        let (status, _) = app.get("/api/v1/billing?paymentStatus=Refunded").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_billing_is_not_found() {
        let app = TestApp::new();
        let id = BillingBuilder::new().build().id;
        let (status, _) = app.get(&format!("/api/v1/billing/{}", id.as_uuid())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod payment {
    use super::*;

    async fn put_payment(app: &TestApp, billing: &Billing, body: Value) -> (StatusCode, Value) {
        app.send(
            Method::PUT,
            &format!("/api/v1/billing/{}/payment", billing.id.as_uuid()),
            Some(roles::ACCOUNTANT),
            Some(body),
        )
        .await
    }

    #[tokio::test]
    async fn test_mark_paid_sets_paid_date_and_method() {
        let app = TestApp::new();
        let billing = app.seed_billing(BillingBuilder::new().service("A", dec!(100)).build()).await;

        let (status, body) = put_payment(
            &app,
            &billing,
            json!({ "paymentStatus": "Paid", "paymentMethod": "card" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["paymentStatus"], "Paid");
        assert_eq!(body["data"]["paymentMethod"], "card");
        assert!(body["data"]["paidDate"].is_string());
    }

    #[tokio::test]
    async fn test_supplied_paid_date_is_kept() {
        let app = TestApp::new();
        let billing = app.seed_billing(BillingBuilder::new().build()).await;

        let (status, body) = put_payment(
            &app,
            &billing,
            json!({ "paymentStatus": "PartiallyPaid", "paidDate": "2024-01-20T09:00:00Z" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["paidDate"], "2024-01-20T09:00:00Z");
    }

    #[tokio::test]
    async fn test_permissive_reversal_clears_paid_date() {
        let app = TestApp::new();
        let billing = app.seed_billing(BillingBuilder::new().paid().build()).await;

        let (status, body) = put_payment(&app, &billing, json!({ "paymentStatus": "Unpaid" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["paymentStatus"], "Unpaid");
        assert!(body["data"]["paidDate"].is_null());
    }

    #[tokio::test]
    async fn test_strict_reversal_is_conflict() {
        let app = TestApp::with_config(ApiConfig {
            strict_payment_transitions: true,
            ..ApiConfig::default()
        });
        let billing = app.seed_billing(BillingBuilder::new().paid().build()).await;

        let (status, body) = put_payment(&app, &billing, json!({ "paymentStatus": "Unpaid" })).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn test_invalid_status_label_is_bad_request() {
        let app = TestApp::new();
        let billing = app.seed_billing(BillingBuilder::new().build()).await;
        let (status, _) = put_payment(&app, &billing, json!({ "paymentStatus": "paid-ish" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_billing_is_not_found() {
        let app = TestApp::new();
        let billing = BillingBuilder::new().build();
        let (status, _) = put_payment(&app, &billing, json!({ "paymentStatus": "Paid" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod reports {
    use super::*;

    #[tokio::test]
    async fn test_revenue_requires_both_bounds() {
        let app = TestApp::new();
        let (status, body) = app.get("/api/v1/reports/revenue?startDate=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_revenue_counts_paid_bills_only() {
        let app = TestApp::new();
        app.seed_billing(BillingBuilder::new().total(dec!(100)).build()).await;
        app.seed_billing(BillingBuilder::new().total(dec!(200)).paid().build()).await;

        let (status, body) = app
            .get("/api/v1/reports/revenue?startDate=2024-01-01&endDate=2024-01-31T23:59:59Z")
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalRevenue"].as_f64(), Some(200.0));
        assert_eq!(body["data"]["totalBills"], 1);
        assert_eq!(body["data"]["averagePerBill"].as_f64(), Some(200.0));
    }

    #[tokio::test]
    async fn test_reversed_window_is_bad_request() {
        let app = TestApp::new();
        let (status, _) = app
            .get("/api/v1/reports/patient-visits?startDate=2024-02-01&endDate=2024-01-01")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patient_visits_groups_by_category() {
        let app = TestApp::new();
        app.seed_record().await;

        let (status, body) = app
            .get("/api/v1/reports/patient-visits?startDate=2024-01-01&endDate=2024-01-31T23:59:59Z")
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalVisits"], 1);
        assert_eq!(body["data"]["patientTypeCounts"]["Insured"], 1);
    }

    #[tokio::test]
    async fn test_top_services_has_both_rankings() {
        let app = TestApp::new();
        app.seed_record().await;
        app.seed_billing(BillingBuilder::new().service("A", dec!(100)).build()).await;

        let (status, body) = app.get("/api/v1/reports/top-services?limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["billingBased"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["recordBased"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_top_services_rejects_zero_limit() {
        let app = TestApp::new();
        let (status, _) = app.get("/api/v1/reports/top-services?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_counts_patients() {
        let app = TestApp::new();
        app.seed_record().await;

        let (status, body) = app.get("/api/v1/reports/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalPatients"], 1);
        assert_eq!(body["data"]["todayRevenue"].as_f64(), Some(0.0));
    }

    #[tokio::test]
    async fn test_sample_records_include_patient() {
        let app = TestApp::new();
        app.seed_record().await;

        let (status, body) = app.get("/api/v1/reports/sample-records?limit=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["samples"][0]["patient"]["category"], "Insured");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let app = TestApp::new();
        app.billings.set_unavailable(true);

        let (status, body) = app.get("/api/v1/reports/dashboard").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }
}
