//! Integration tests for the public endpoints: health and key verification.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get, test_app};
use license_server::db::DbPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Store a license directly, bypassing the API.
async fn seed_license(pool: &DbPool, user_id: i64, key: &str) {
    sqlx::query("INSERT INTO licenses (id, user_id, license_key, issued_at) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(key)
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("seed license");
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn verify_without_key_is_invalid() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/licensing/v1/verify")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["message"], "no license key provided");
}

#[tokio::test]
async fn verify_with_empty_key_is_invalid() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/licensing/v1/verify?key=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["message"], "no license key provided");
}

#[tokio::test]
async fn verify_never_issued_key_is_invalid() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(get("/licensing/v1/verify?key=LIC-AAAA-BBBB-CCCC-DDDD"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["message"], "license key is not valid");
}

#[tokio::test]
async fn verify_issued_key_is_valid() {
    let (app, pool) = test_app().await;
    seed_license(&pool, 7, "LIC-TEST-KEY-0001").await;

    let response = app
        .oneshot(get("/licensing/v1/verify?key=LIC-TEST-KEY-0001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "valid");
    assert_eq!(body["message"], "license key is valid");
}

#[tokio::test]
async fn verify_trims_surrounding_whitespace() {
    let (app, pool) = test_app().await;
    seed_license(&pool, 8, "LIC-TEST-KEY-0002").await;

    let response = app
        .oneshot(get("/licensing/v1/verify?key=%20LIC-TEST-KEY-0002%20"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "valid");
}

#[tokio::test]
async fn verify_is_case_sensitive() {
    let (app, pool) = test_app().await;
    seed_license(&pool, 9, "LIC-TEST-KEY-0003").await;

    let response = app
        .oneshot(get("/licensing/v1/verify?key=lic-test-key-0003"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "invalid");
}
