//! Request middleware.

/// Admin API key authentication
pub mod auth;
