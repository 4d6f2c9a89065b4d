//! Integration tests for authentication and authorization.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p inkpress-admin)
//! - `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD` for an existing admin account
//!
//! Run with: cargo test -p inkpress-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use inkpress_integration_tests::{admin_base_url, admin_credentials};

/// Create a cookie-holding client.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log the test admin in, returning the client holding its session cookie.
async fn logged_in_client() -> Client {
    let (email, password) = admin_credentials().expect("ADMIN_TEST_EMAIL/PASSWORD not set");
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_health_is_public() {
    let resp = client()
        .get(format!("{}/health", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_protected_route_rejects_anonymous() {
    let resp = client()
        .get(format!("{}/customers", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach customers endpoint");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_rejects_bad_password() {
    let (email, _) = admin_credentials().expect("ADMIN_TEST_EMAIL/PASSWORD not set");

    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({"email": email, "password": "definitely-wrong"}))
        .send()
        .await
        .expect("Failed to reach login endpoint");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_and_me_roundtrip() {
    let client = logged_in_client().await;

    let resp = client
        .get(format!("{}/auth/me", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach /auth/me");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["role"], "admin");
    assert!(body["id"].is_i64());
    // The password hash must never appear on the API surface
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_logout_clears_session() {
    let client = logged_in_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to reach /auth/me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_invite_rejects_user_role() {
    let client = logged_in_client().await;

    let resp = client
        .post(format!("{}/invites", admin_base_url()))
        .json(&json!({
            "email": "someone@example.com",
            "name": "Someone",
            "role": "user"
        }))
        .send()
        .await
        .expect("Failed to reach invites endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server, database, and a non-admin account"]
async fn test_admin_routes_forbidden_for_non_admin() {
    // Requires ADMIN_TEST_EMAIL/PASSWORD pointing at a `user`-role account.
    let client = logged_in_client().await;

    let resp = client
        .get(format!("{}/users", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach users endpoint");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Admin access required");
}
