//! Purchase intake HTTP handler.
//!
//! `POST /api/v1/purchases` is the service's stand-in for a commerce
//! platform's order-completed notification: the storefront (or an operator)
//! reports which products a user's completed order contained, and issuance
//! runs immediately if the purchase completes the required set.

use crate::{
    AppState,
    error::AppError,
    models::purchase::{PurchaseResponse, RecordPurchaseRequest},
    services::license_service,
};
use axum::{Json, extract::State};

/// Record a completed order and re-evaluate issuance.
///
/// # Endpoint
///
/// `POST /api/v1/purchases`
///
/// # Authentication
///
/// Requires the admin API key.
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": 7,
///   "product_ids": [101, 205]
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the user's full owned set plus their license if
///   they now hold one (`license` is null while requirements are unmet)
/// - **Error (400)**: empty product list or non-positive IDs
/// - **Error (401)**: invalid admin key
///
/// # Idempotency
///
/// Re-posting an order is harmless: already-owned products are skipped and
/// an already-licensed user keeps their existing key.
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(request): Json<RecordPurchaseRequest>,
) -> Result<Json<PurchaseResponse>, AppError> {
    if request.user_id <= 0 {
        return Err(AppError::InvalidRequest(
            "User ID must be positive".to_string(),
        ));
    }
    if request.product_ids.is_empty() {
        return Err(AppError::InvalidRequest(
            "Product ID list must not be empty".to_string(),
        ));
    }
    if request.product_ids.iter().any(|id| *id <= 0) {
        return Err(AppError::InvalidRequest(
            "Product IDs must be positive".to_string(),
        ));
    }

    license_service::record_purchases(&state.pool, request.user_id, &request.product_ids).await?;

    // Issue now if this order completed the required set. Ineligibility is
    // the normal partial-progress case, not an error for this endpoint.
    let license = match license_service::issue_license(&state.pool, request.user_id).await {
        Ok(license) => Some(license.into()),
        Err(AppError::NotEligible(_)) => None,
        Err(e) => return Err(e),
    };

    let owned_product_ids = license_service::purchases_for_user(&state.pool, request.user_id)
        .await?
        .into_iter()
        .map(|p| p.product_id)
        .collect();

    Ok(Json(PurchaseResponse {
        user_id: request.user_id,
        owned_product_ids,
        license,
    }))
}
