//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `ADMIN_API_KEY` (required): bearer key for the admin endpoints
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to
///   `sqlite:licensing.db?mode=rwc`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `REQUIRED_PRODUCT_IDS` (optional): comma-separated product IDs that
///   must all be purchased before a key is issued; overrides stored settings
///   at startup
/// - `LICENSE_KEY_PREFIX` (optional): prefix for generated license keys;
///   overrides stored settings at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub admin_api_key: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub required_product_ids: Option<String>,

    pub license_key_prefix: Option<String>,
}

/// Default database location: a SQLite file next to the binary,
/// created on first run (`mode=rwc`).
fn default_database_url() -> String {
    "sqlite:licensing.db?mode=rwc".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., ADMIN_API_KEY)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: admin_api_key -> ADMIN_API_KEY
        envy::from_env::<Config>()
    }
}
