//! Public license verification endpoint.
//!
//! This is the endpoint consumed by the bot: it submits a user-supplied key
//! and gates access on the answer. It is deliberately unauthenticated and
//! never returns an error status; every outcome is a 200 with a
//! valid/invalid verdict, so clients have exactly one response shape to
//! handle.

use crate::{AppState, error::AppError, services::license_service};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

/// Query parameters for the verify endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// The license key to check
    pub key: Option<String>,
}

/// Verification verdict returned to the client.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": "valid",
///   "message": "license key is valid"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// "valid" or "invalid"
    pub status: String,

    /// Human-readable explanation
    pub message: String,
}

impl VerifyResponse {
    fn valid() -> Self {
        Self {
            status: "valid".to_string(),
            message: "license key is valid".to_string(),
        }
    }

    fn invalid(message: &str) -> Self {
        Self {
            status: "invalid".to_string(),
            message: message.to_string(),
        }
    }
}

/// Verify a submitted license key.
///
/// # Endpoint
///
/// `GET /licensing/v1/verify?key=<token>`
///
/// # Responses (always 200 OK)
///
/// - Missing or empty `key` parameter: `{"status":"invalid","message":"no license key provided"}`
/// - Unknown key: `{"status":"invalid","message":"license key is not valid"}`
/// - Stored key: `{"status":"valid","message":"license key is valid"}`
///
/// Only a database failure produces a non-200 response.
pub async fn verify_license(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<VerifyResponse>, AppError> {
    let key = match params.key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => return Ok(Json(VerifyResponse::invalid("no license key provided"))),
    };

    if license_service::verify_key(&state.pool, &key).await? {
        Ok(Json(VerifyResponse::valid()))
    } else {
        Ok(Json(VerifyResponse::invalid("license key is not valid")))
    }
}
