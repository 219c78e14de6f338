//! Request and response DTOs
//!
//! Wire shapes are camelCase JSON. Successful responses are wrapped in
//! [`ApiResponse`]; errors use [`crate::error::ErrorResponse`].

pub mod billing;
pub mod reports;

use axum::Json;
use serde::Serialize;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn json(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

/// Treats an empty or whitespace-only query value as absent
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
