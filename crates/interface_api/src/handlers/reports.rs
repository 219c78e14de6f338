//! Report handlers

use axum::{
    extract::{Query, State},
    Json,
};

use domain_reporting::{
    DashboardStats, PatientVisitReport, RevenueReport, SampleRecords, TopServicesReport,
};

use crate::dto::reports::{LimitParams, RangeParams, TopServicesParams};
use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

pub async fn revenue_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ApiResponse<RevenueReport>>, ApiError> {
    let report = state.reporting.revenue_report(params.required()?).await?;
    Ok(ApiResponse::json(report))
}

pub async fn patient_visit_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ApiResponse<PatientVisitReport>>, ApiError> {
    let report = state.reporting.patient_visit_report(params.required()?).await?;
    Ok(ApiResponse::json(report))
}

pub async fn top_services_report(
    State(state): State<AppState>,
    Query(params): Query<TopServicesParams>,
) -> Result<Json<ApiResponse<TopServicesReport>>, ApiError> {
    let report = state
        .reporting
        .top_services_report(params.window()?, params.limit)
        .await?;
    Ok(ApiResponse::json(report))
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let stats = state.reporting.dashboard_stats().await?;
    Ok(ApiResponse::json(stats))
}

/// Newest records with their patients, for data inspection
pub async fn sample_records(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<ApiResponse<SampleRecords>>, ApiError> {
    let samples = state.reporting.sample_records(params.limit).await?;
    Ok(ApiResponse::json(samples))
}
