//! HTTP API Layer
//!
//! This crate provides the REST API for the clinic billing and reporting
//! core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for billing, reports and health
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, Stores};
//!
//! let state = AppState::new(stores, config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use core_kernel::CoreError;
use domain_billing::{BillingPort, BillingService};
use domain_records::{PatientPort, RecordPort};
use domain_reporting::ReportingService;

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{billing, reports, health};

/// The store adapters the services run against
#[derive(Clone)]
pub struct Stores {
    pub records: Arc<dyn RecordPort>,
    pub patients: Arc<dyn PatientPort>,
    pub billings: Arc<dyn BillingPort>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub billing: Arc<BillingService>,
    pub reporting: Arc<ReportingService>,
    pub stores: Stores,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the services onto the stores
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` for an unknown clinic timezone
    pub fn new(stores: Stores, config: ApiConfig) -> Result<Self, CoreError> {
        let timezone = config.timezone()?;

        let billing = BillingService::new(stores.records.clone(), stores.billings.clone())
            .with_strict_transitions(config.strict_payment_transitions);
        let reporting = ReportingService::new(
            stores.records.clone(),
            stores.patients.clone(),
            stores.billings.clone(),
        )
        .with_timezone(timezone);

        Ok(Self {
            billing: Arc::new(billing),
            reporting: Arc::new(reporting),
            stores,
            config,
        })
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Services, stores and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let billing_routes = Router::new()
        .route("/", post(billing::create_billing))
        .route("/", get(billing::list_billings))
        .route("/:id", get(billing::get_billing))
        .route("/:id/payment", put(billing::update_payment_status));

    let report_routes = Router::new()
        .route("/revenue", get(reports::revenue_report))
        .route("/patient-visits", get(reports::patient_visit_report))
        .route("/top-services", get(reports::top_services_report))
        .route("/dashboard", get(reports::dashboard_stats))
        .route("/sample-records", get(reports::sample_records));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/billing", billing_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
