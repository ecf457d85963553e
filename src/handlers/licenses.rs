//! License management HTTP handlers.
//!
//! This module implements the license-related admin endpoints:
//! - GET /api/v1/users/{user_id}/license - Per-user license status
//! - POST /api/v1/users/{user_id}/license - Explicit issuance
//! - GET /api/v1/licenses - List all issued licenses
//! - POST /api/v1/licenses - Manual admin issuance
//! - DELETE /api/v1/licenses/{key} - Admin revocation

use crate::{
    AppState,
    error::AppError,
    models::license::{CreateLicenseRequest, LicenseResponse, UserLicenseResponse},
    services::license_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// Report a user's license status (the customer-facing surface).
///
/// # Endpoint
///
/// `GET /api/v1/users/{user_id}/license`
///
/// # Authentication
///
/// Requires the admin API key; the bot backend proxies this for its users.
///
/// # Response (200 OK)
///
/// Always 200 — "no license yet" is a status, not an error:
///
/// ```json
/// {
///   "user_id": 7,
///   "license": null,
///   "eligible": false,
///   "missing_product_ids": [205]
/// }
/// ```
pub async fn get_user_license(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserLicenseResponse>, AppError> {
    let license = license_service::find_license_by_user(&state.pool, user_id).await?;
    let check = license_service::check_eligibility(&state.pool, user_id).await?;

    // A licensed user is eligible by definition, whatever the current
    // required set says
    let eligible = license.is_some() || check.eligible;

    Ok(Json(UserLicenseResponse {
        user_id,
        license: license.map(Into::into),
        eligible,
        missing_product_ids: check.missing_product_ids,
    }))
}

/// Run issuance for a user explicitly.
///
/// # Endpoint
///
/// `POST /api/v1/users/{user_id}/license`
///
/// # Authentication
///
/// Requires the admin API key.
///
/// # Response
///
/// - **Success (200 OK)**: the license; an already-licensed user gets their
///   existing key back unchanged
/// - **Error (422)**: user is not eligible (message names the missing
///   product IDs, or "no recorded purchases")
/// - **Error (401)**: invalid admin key
pub async fn issue_user_license(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<LicenseResponse>, AppError> {
    if user_id <= 0 {
        return Err(AppError::InvalidRequest(
            "User ID must be positive".to_string(),
        ));
    }

    let license = license_service::issue_license(&state.pool, user_id).await?;

    Ok(Json(license.into()))
}

/// List all issued licenses.
///
/// # Endpoint
///
/// `GET /api/v1/licenses`
///
/// # Authentication
///
/// Requires the admin API key.
///
/// # Response (200 OK)
///
/// Array of licenses (may be empty), newest first.
pub async fn list_licenses(
    State(state): State<AppState>,
) -> Result<Json<Vec<LicenseResponse>>, AppError> {
    let licenses = license_service::list_licenses(&state.pool).await?;

    let responses: Vec<LicenseResponse> = licenses.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Manually store a license (admin surface).
///
/// Skips the eligibility check: this is the operator's escape hatch for
/// comped or migrated keys. When `license_key` is omitted, a key is
/// generated with the configured prefix.
///
/// # Endpoint
///
/// `POST /api/v1/licenses`
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": 42,
///   "license_key": "BOT-AAAA-BBBB-CCCC-DDDD"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the stored license
/// - **Error (409)**: user already licensed, or key already in use
/// - **Error (400)**: non-positive user ID or blank key
/// - **Error (401)**: invalid admin key
pub async fn create_license(
    State(state): State<AppState>,
    Json(request): Json<CreateLicenseRequest>,
) -> Result<Json<LicenseResponse>, AppError> {
    if request.user_id <= 0 {
        return Err(AppError::InvalidRequest(
            "User ID must be positive".to_string(),
        ));
    }

    let key = match request.license_key.as_deref().map(str::trim) {
        Some("") => {
            return Err(AppError::InvalidRequest(
                "License key must not be blank".to_string(),
            ));
        }
        Some(key) => key.to_string(),
        None => {
            let settings = license_service::get_settings(&state.pool).await?;
            license_service::generate_key(&settings.key_prefix)
        }
    };

    let license = license_service::add_license(&state.pool, request.user_id, &key).await?;

    Ok(Json(license.into()))
}

/// Delete a license by key (admin revocation).
///
/// # Endpoint
///
/// `DELETE /api/v1/licenses/{key}`
///
/// # Response
///
/// - **Success (204 No Content)**: the key no longer verifies
/// - **Error (404)**: no such key
/// - **Error (401)**: invalid admin key
pub async fn delete_license(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    license_service::delete_license(&state.pool, &key).await?;

    Ok(StatusCode::NO_CONTENT)
}
