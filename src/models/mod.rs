//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the API request/response types derived from them.

/// Issued license records
pub mod license;
/// Completed-order purchase records
pub mod purchase;
/// Licensing settings (required products, key prefix)
pub mod settings;
