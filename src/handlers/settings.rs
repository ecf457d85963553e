//! Licensing settings HTTP handlers.
//!
//! This module implements the admin settings surface:
//! - GET /api/v1/settings - Read current settings
//! - PUT /api/v1/settings - Update required products and/or key prefix

use crate::{
    AppState,
    error::AppError,
    models::settings::{SettingsResponse, UpdateSettingsRequest},
    services::license_service,
};
use axum::{Json, extract::State};

/// Read the current licensing settings.
///
/// # Endpoint
///
/// `GET /api/v1/settings`
///
/// # Authentication
///
/// Requires the admin API key in the Authorization header.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "required_product_ids": [101, 205],
///   "key_prefix": "LIC",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = license_service::get_settings(&state.pool).await?;

    Ok(Json(settings.into()))
}

/// Update licensing settings.
///
/// # Endpoint
///
/// `PUT /api/v1/settings`
///
/// # Authentication
///
/// Requires the admin API key.
///
/// # Request Body
///
/// Both fields optional; omitted fields keep their current value.
///
/// ```json
/// {
///   "required_product_ids": [101, 205],
///   "key_prefix": "BOT"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the updated settings
/// - **Error (400)**: non-positive product ID or malformed prefix
/// - **Error (401)**: invalid admin key
///
/// Changing the prefix only affects keys generated afterwards; issued keys
/// are immutable.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = license_service::update_settings(
        &state.pool,
        request.required_product_ids,
        request.key_prefix,
    )
    .await?;

    Ok(Json(settings.into()))
}
