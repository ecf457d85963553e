//! License Server - issues and verifies license keys for bot access.
//!
//! This is a REST API server that issues license keys to users who have
//! purchased a required set of products, and exposes a public endpoint for
//! verifying a submitted key.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries, embedded migrations)
//! - **Authentication**: admin API key with SHA-256 hashing
//! - **Format**: JSON requests/responses
//!
//! # Route Groups
//!
//! - Public: `/health`, `/licensing/v1/verify` (consumed by the bot)
//! - Admin (Bearer key): settings, purchase intake, license management

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::DbPool;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: DbPool,

    /// SHA-256 hex digest of the configured admin API key
    ///
    /// The plaintext key never lives in memory past startup; the auth
    /// middleware hashes the presented key and compares digests.
    pub admin_key_hash: String,
}

impl AppState {
    /// Build application state from a pool and the plaintext admin key.
    pub fn new(pool: DbPool, admin_api_key: &str) -> Self {
        Self {
            pool,
            admin_key_hash: middleware::auth::sha256_hex(admin_api_key),
        }
    }
}

/// Build the HTTP router with all routes and middleware.
///
/// Exposed from the library so integration tests can drive the exact
/// production router without binding a socket.
pub fn app(state: AppState) -> Router {
    // Admin routes (API key required)
    let admin_routes = Router::new()
        // Licensing settings
        .route("/api/v1/settings", get(handlers::settings::get_settings))
        .route("/api/v1/settings", put(handlers::settings::update_settings))
        // Purchase intake (completed orders)
        .route(
            "/api/v1/purchases",
            post(handlers::purchases::record_purchase),
        )
        // Per-user license status and explicit issuance
        .route(
            "/api/v1/users/{user_id}/license",
            get(handlers::licenses::get_user_license),
        )
        .route(
            "/api/v1/users/{user_id}/license",
            post(handlers::licenses::issue_user_license),
        )
        // License management
        .route("/api/v1/licenses", get(handlers::licenses::list_licenses))
        .route("/api/v1/licenses", post(handlers::licenses::create_license))
        .route(
            "/api/v1/licenses/{key}",
            delete(handlers::licenses::delete_license),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route(
            "/licensing/v1/verify",
            get(handlers::verify::verify_license),
        )
        // Merge admin routes
        .merge(admin_routes)
        // Request tracing for observability
        .layer(TraceLayer::new_for_http())
        // The verify endpoint is consumed by external clients
        .layer(CorsLayer::permissive())
        // Share state with all handlers via State extraction
        .with_state(state)
}
