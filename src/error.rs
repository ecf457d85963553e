//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// Note that public license verification never surfaces these: missing or
/// unknown keys degrade to an `invalid` verification result rather than an
/// error response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Admin API key is missing or does not match the configured key.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Requested license record does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("License not found")]
    LicenseNotFound,

    /// User's purchase history does not cover the required product set.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String names the shortfall (missing product IDs, or no purchases).
    #[error("User is not eligible for a license: {0}")]
    NotEligible(String),

    /// A license already exists for this user or with this key.
    ///
    /// Returns HTTP 409 Conflict. Issued keys are first-write-wins and are
    /// never silently replaced.
    #[error("Duplicate license: {0}")]
    DuplicateLicense(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::LicenseNotFound => {
                (StatusCode::NOT_FOUND, "license_not_found", self.to_string())
            }
            AppError::NotEligible(ref msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "not_eligible", msg.clone())
            }
            AppError::DuplicateLicense(ref msg) => {
                (StatusCode::CONFLICT, "duplicate_license", msg.clone())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                // Hide database details from clients
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
