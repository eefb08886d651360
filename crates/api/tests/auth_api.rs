//! Integration tests for registration, login, refresh rotation, and logout.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

fn register_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.test"),
        "password": common::TEST_PASSWORD,
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_then_login(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response =
        common::post(app.clone(), "/api/v1/auth/register", None, register_body("alice")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::body_json(response).await;
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
    assert_eq!(json["user"]["username"], "alice");

    let response = common::post(
        app,
        "/api/v1/auth/login",
        None,
        json!({ "username": "alice", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::post(
        app,
        "/api/v1/auth/register",
        None,
        json!({ "username": "alice", "email": "alice@example.test", "password": "short" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_username_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first =
        common::post(app.clone(), "/api/v1/auth/register", None, register_body("alice")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = common::post(
        app,
        "/api/v1/auth/register",
        None,
        json!({
            "username": "alice",
            "email": "other@example.test",
            "password": common::TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = common::body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_wrong_password(pool: PgPool) {
    common::seed_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = common::post(
        app,
        "/api/v1/auth/login",
        None,
        json!({ "username": "alice", "password": "definitely-not-it" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response =
        common::post(app.clone(), "/api/v1/auth/register", None, register_body("alice")).await;
    let json = common::body_json(response).await;
    let refresh_token = json["refreshToken"].as_str().unwrap().to_string();

    // First exchange succeeds and returns a different refresh token.
    let response = common::post(
        app.clone(),
        "/api/v1/auth/refresh",
        None,
        json!({ "refreshToken": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = common::body_json(response).await;
    assert_ne!(rotated["refreshToken"].as_str().unwrap(), refresh_token);

    // The old token was revoked by the rotation.
    let response = common::post(
        app,
        "/api/v1/auth/refresh",
        None,
        json!({ "refreshToken": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response =
        common::post(app.clone(), "/api/v1/auth/register", None, register_body("alice")).await;
    let json = common::body_json(response).await;
    let access_token = json["accessToken"].as_str().unwrap().to_string();
    let refresh_token = json["refreshToken"].as_str().unwrap().to_string();

    let response = common::post(
        app.clone(),
        "/api/v1/auth/logout",
        Some(&access_token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Refresh tokens die with the session.
    let response = common::post(
        app,
        "/api/v1/auth/refresh",
        None,
        json!({ "refreshToken": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
