//! Shared helpers for integration tests.
//!
//! Tests drive the production router directly via `tower::ServiceExt::oneshot`
//! against an in-memory SQLite database; no socket is bound.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use license_server::{AppState, db::DbPool};
use sqlx::sqlite::SqlitePoolOptions;

/// Admin key the test application is configured with.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Build the application router backed by a fresh in-memory database.
pub async fn test_app() -> (Router, DbPool) {
    // Single connection: every pooled connection would otherwise get its
    // own private in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let state = AppState::new(pool.clone(), ADMIN_KEY);
    (license_server::app(state), pool)
}

/// Unauthenticated GET request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Admin GET request.
pub fn admin_get(uri: &str) -> Request<Body> {
    admin_empty(Method::GET, uri)
}

/// Admin POST request with no body.
pub fn admin_post(uri: &str) -> Request<Body> {
    admin_empty(Method::POST, uri)
}

/// Admin DELETE request.
pub fn admin_delete(uri: &str) -> Request<Body> {
    admin_empty(Method::DELETE, uri)
}

fn admin_empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"))
        .body(Body::empty())
        .unwrap()
}

/// Admin request with a JSON body.
pub fn admin_json(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
