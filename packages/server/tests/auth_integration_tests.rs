//! Integration tests for registration, login, and the /auth/me profile.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use test_context::test_context;

use common::{create_test_shelter, create_test_user, send_json, TestHarness, TEST_PASSWORD};
use shelter_core::domains::auth::models::Role;

#[test_context(TestHarness)]
#[tokio::test]
async fn test_register_login_me_round_trip(ctx: &TestHarness) {
    // Register
    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "newuser@example.org",
            "password": "a-long-enough-password",
            "role": "public",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "newuser@example.org");
    assert_eq!(body["role"], "public");
    assert!(body.get("hashed_password").is_none());
    assert!(body.get("password").is_none());

    // Login
    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({
            "email": "newuser@example.org",
            "password": "a-long-enough-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    // Profile with the fresh token
    let (status, body) =
        send_json(ctx.app(), Method::GET, "/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "newuser@example.org");
    assert_eq!(body["role"], "public");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_register_rejects_bad_email_and_short_password(ctx: &TestHarness) {
    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "longenough" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Invalid email address");

    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "short@example.org", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Password must be at least 8 characters");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_register_duplicate_email(ctx: &TestHarness) {
    create_test_user(&ctx.db_pool, "taken@example.org", Role::Public, None)
        .await
        .unwrap();

    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "taken@example.org", "password": "longenough" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_register_shelter_role_with_shelter_id(ctx: &TestHarness) {
    let shelter = create_test_shelter(&ctx.db_pool, "Harbor Light").await.unwrap();

    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "staff@example.org",
            "password": "longenough",
            "role": "shelter",
            "shelter_id": shelter.id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "shelter");
    assert_eq!(body["shelter_id"], shelter.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_user(ctx: &TestHarness) {
    create_test_user(&ctx.db_pool, "known@example.org", Role::Public, None)
        .await
        .unwrap();

    let (status, body) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "known@example.org", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Not authenticated");

    // Unknown email gets the same answer; no user enumeration
    let (status, _) = send_json(
        ctx.app(),
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.org", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_me_requires_token(ctx: &TestHarness) {
    let (status, body) = send_json(ctx.app(), Method::GET, "/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Not authenticated");

    // Garbage token is treated the same as no token
    let (status, _) = send_json(
        ctx.app(),
        Method::GET,
        "/auth/me",
        Some("not.a.jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
