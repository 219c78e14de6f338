//! Billing handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain_billing::Billing;

use crate::auth::{require_billing_manager, Claims};
use crate::dto::billing::*;
use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

/// Derives and stores a billing from a medical record
pub async fn create_billing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateBillingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Billing>>), ApiError> {
    require_billing_manager(&claims)?;
    request.validate()?;

    let billing = state.billing.create_billing(request.into_command()?).await?;
    Ok((StatusCode::CREATED, ApiResponse::json(billing)))
}

/// Lists billings, newest first
pub async fn list_billings(
    State(state): State<AppState>,
    Query(params): Query<BillingListParams>,
) -> Result<Json<ApiResponse<Vec<Billing>>>, ApiError> {
    let billings = state.billing.list_billings(params.into_query()?).await?;
    Ok(ApiResponse::json(billings))
}

/// Gets a billing by ID
pub async fn get_billing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Billing>>, ApiError> {
    let billing = state.billing.get_billing(parse_billing_id(&id)?).await?;
    Ok(ApiResponse::json(billing))
}

/// Updates payment status, method and paid date
pub async fn update_payment_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<Billing>>, ApiError> {
    require_billing_manager(&claims)?;
    request.validate()?;

    let id = parse_billing_id(&id)?;
    let billing = state.billing.update_payment_status(id, request.into_update()?).await?;
    Ok(ApiResponse::json(billing))
}
