//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
    #[error("Token lifetime out of range: {0} seconds")]
    InvalidExpiration(u64),
}

/// Creates a new JWT token
///
/// Tokens are normally issued by the clinic's login service; this is used
/// by tests and local tooling.
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
///
/// # Errors
///
/// `InvalidExpiration` when the expiry does not fit a timestamp
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or(AuthError::InvalidExpiration(expiration_secs))?;

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
///
/// # Arguments
///
/// * `token` - The JWT token to validate
/// * `secret` - JWT secret key
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == roles::ADMIN)
}

/// Billing writes are limited to admins and accountants
pub fn can_manage_billing(claims: &Claims) -> bool {
    has_role(claims, roles::ACCOUNTANT)
}

/// Fails with `MissingPermission` unless the user may manage billing
pub fn require_billing_manager(claims: &Claims) -> Result<(), AuthError> {
    if can_manage_billing(claims) {
        Ok(())
    } else {
        Err(AuthError::MissingPermission("billing:manage".to_string()))
    }
}

/// Role names
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const ACCOUNTANT: &str = "accountant";
    pub const DOCTOR: &str = "doctor";
    pub const RECEPTIONIST: &str = "receptionist";
}
