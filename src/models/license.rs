//! License data models and API request/response types.
//!
//! This module defines:
//! - `License`: database entity for an issued license
//! - `CreateLicenseRequest`: request body for manual admin issuance
//! - `LicenseResponse` / `UserLicenseResponse`: response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an issued license record from the database.
///
/// # Database Table
///
/// Maps to the `licenses` table. Each license:
/// - Belongs to exactly one user (`user_id` is unique)
/// - Is immutable once issued: re-running issuance never changes the key
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct License {
    /// Unique identifier for this license record
    pub id: Uuid,

    /// The user this license was issued to
    pub user_id: i64,

    /// The opaque license key string presented by clients for verification
    pub license_key: String,

    /// Timestamp when the license was issued
    pub issued_at: DateTime<Utc>,
}

/// Request body for manually creating a license (admin surface).
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": 42,
///   "license_key": "BOT-AAAA-BBBB-CCCC-DDDD"
/// }
/// ```
///
/// # Validation
///
/// - `user_id`: required, positive
/// - `license_key`: optional; a key is generated with the configured prefix
///   when omitted
#[derive(Debug, Deserialize)]
pub struct CreateLicenseRequest {
    /// User to issue the license to
    pub user_id: i64,

    /// Explicit key to store (generated if not provided)
    pub license_key: Option<String>,
}

/// Response body for license endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "user_id": 42,
///   "license_key": "LIC-8F3K-29DQ-XN4M-P7WT",
///   "issued_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct LicenseResponse {
    /// License record identifier
    pub id: Uuid,

    /// Owner of the license
    pub user_id: i64,

    /// The issued key
    pub license_key: String,

    /// Issuance timestamp
    pub issued_at: DateTime<Utc>,
}

impl From<License> for LicenseResponse {
    fn from(license: License) -> Self {
        Self {
            id: license.id,
            user_id: license.user_id,
            license_key: license.license_key,
            issued_at: license.issued_at,
        }
    }
}

/// Per-user license status (the customer-facing surface).
///
/// Reports the user's license if one has been issued, or their current
/// eligibility and which required products are still missing.
///
/// # JSON Example (not yet licensed)
///
/// ```json
/// {
///   "user_id": 7,
///   "license": null,
///   "eligible": false,
///   "missing_product_ids": [205]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserLicenseResponse {
    pub user_id: i64,

    /// The issued license, if any
    pub license: Option<LicenseResponse>,

    /// Whether the user currently qualifies for issuance
    pub eligible: bool,

    /// Required product IDs absent from the user's purchase history
    pub missing_product_ids: Vec<i64>,
}
