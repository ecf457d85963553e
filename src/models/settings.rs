//! Licensing settings model and API types.
//!
//! This module defines:
//! - `Settings`: the single stored settings row
//! - `UpdateSettingsRequest`: partial-update request body
//! - `SettingsResponse`: response body returned to admins
//!
//! The required-product list is stored as a comma-separated string, matching
//! how an operator supplies it via `REQUIRED_PRODUCT_IDS`; the API speaks
//! `Vec<i64>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;

/// The stored licensing settings.
///
/// # Database Table
///
/// Maps to the `settings` table, which holds exactly one row (`id = 1`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Settings {
    /// Always 1 (enforced by a CHECK constraint)
    pub id: i64,

    /// Comma-separated product IDs that must all be purchased before a
    /// license is issued. Empty string means no requirement.
    pub required_product_ids: String,

    /// Prefix for generated license keys (e.g. "LIC" -> "LIC-XXXX-...")
    pub key_prefix: String,

    /// Timestamp of last settings change
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// The required-product set as a list of IDs.
    ///
    /// Stored settings are validated on write, so a malformed stored value
    /// degrades to "no requirement" rather than failing reads.
    pub fn required_products(&self) -> Vec<i64> {
        parse_product_ids(&self.required_product_ids).unwrap_or_default()
    }
}

/// Parse a comma-separated product ID list.
///
/// Whitespace around entries is ignored and empty entries are skipped, so
/// `"10, 20,"` parses as `[10, 20]`. Duplicates are dropped, first
/// occurrence wins (comparison downstream is set-containment).
pub fn parse_product_ids(raw: &str) -> Result<Vec<i64>, ParseIntError> {
    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id: i64 = part.parse()?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Format a product ID list back into its stored comma-separated form.
pub fn format_product_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Request body for updating settings.
///
/// Both fields are optional; omitted fields keep their current value.
///
/// # JSON Example
///
/// ```json
/// {
///   "required_product_ids": [101, 205],
///   "key_prefix": "BOT"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Product IDs that must all be purchased before issuance
    pub required_product_ids: Option<Vec<i64>>,

    /// Prefix for generated keys (1-16 ASCII alphanumeric characters)
    pub key_prefix: Option<String>,
}

/// Response body for settings endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "required_product_ids": [101, 205],
///   "key_prefix": "BOT",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub required_product_ids: Vec<i64>,
    pub key_prefix: String,
    pub updated_at: DateTime<Utc>,
}

/// Convert the stored Settings row to the API response shape.
impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            required_product_ids: settings.required_products(),
            key_prefix: settings.key_prefix,
            updated_at: settings.updated_at,
        }
    }
}
