//! Purchase data models and API request/response types.
//!
//! Purchases are the externally-owned input to the eligibility check: one
//! row per (user, product) for every completed order. The intake endpoint
//! stands in for the commerce platform's order-completed notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::license::LicenseResponse;

/// Represents a purchase record from the database.
///
/// # Database Table
///
/// Maps to the `purchases` table, primary key (user_id, product_id):
/// recording the same product twice for a user is a no-op.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Purchase {
    /// The purchasing user
    pub user_id: i64,

    /// The purchased product
    pub product_id: i64,

    /// Timestamp when the purchase was first recorded
    pub purchased_at: DateTime<Utc>,
}

/// Request body for recording a completed order.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": 7,
///   "product_ids": [101, 205]
/// }
/// ```
///
/// # Validation
///
/// - `user_id`: positive
/// - `product_ids`: non-empty, all positive
#[derive(Debug, Deserialize)]
pub struct RecordPurchaseRequest {
    /// The purchasing user
    pub user_id: i64,

    /// Product IDs contained in the completed order
    pub product_ids: Vec<i64>,
}

/// Response body for purchase intake.
///
/// Recording purchases re-evaluates eligibility immediately; `license` is
/// populated when the user now holds a key (newly issued or pre-existing).
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": 7,
///   "owned_product_ids": [101, 205],
///   "license": {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "user_id": 7,
///     "license_key": "LIC-8F3K-29DQ-XN4M-P7WT",
///     "issued_at": "2025-12-20T10:00:00Z"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub user_id: i64,

    /// The user's full recorded purchase set after this order
    pub owned_product_ids: Vec<i64>,

    /// The user's license, if they now hold one
    pub license: Option<LicenseResponse>,
}
