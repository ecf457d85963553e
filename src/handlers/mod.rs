//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// Service health endpoint
pub mod health;
/// License management endpoints
pub mod licenses;
/// Purchase intake endpoint
pub mod purchases;
/// Licensing settings endpoints
pub mod settings;
/// Public license verification endpoint
pub mod verify;
