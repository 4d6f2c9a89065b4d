//! Integration tests for the customer CRUD surface.
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

/// Log the test admin in, returning the client holding its session cookie.
async fn logged_in_client() -> Client {
    let (email, password) = admin_credentials().expect("ADMIN_TEST_EMAIL/PASSWORD not set");
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

/// A unique throwaway email per run, derived from the current time.
fn unique_email() -> String {
    let nanos = std::time::UNIX_EPOCH
        .elapsed()
        .expect("clock before epoch")
        .as_nanos();
    format!("it-{nanos}@example.com")
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_customer_crud_happy_path() {
    let client = logged_in_client().await;
    let base_url = admin_base_url();
    let email = unique_email();

    // Create
    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({"email": email, "name": "Test Customer", "phone": "555-0100"}))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Failed to parse body");
    let id = created["id"].as_i64().expect("missing id");
    assert_eq!(created["email"], email.as_str());

    // Read
    let resp = client
        .get(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer");
    assert_eq!(resp.status(), StatusCode::OK);

    // Update
    let resp = client
        .put(format!("{base_url}/customers/{id}"))
        .json(&json!({"email": email, "name": "Renamed Customer", "phone": null}))
        .send()
        .await
        .expect("Failed to update customer");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(updated["name"], "Renamed Customer");
    assert!(updated["phone"].is_null());

    // Delete (admin only)
    let resp = client
        .delete(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_duplicate_customer_email_conflicts() {
    let client = logged_in_client().await;
    let base_url = admin_base_url();
    let email = unique_email();

    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({"email": email, "name": "First"}))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({"email": email, "name": "Second"}))
        .send()
        .await
        .expect("Failed to create duplicate customer");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_malformed_customer_email_rejected() {
    let client = logged_in_client().await;

    let resp = client
        .post(format!("{}/customers", admin_base_url()))
        .json(&json!({"email": "not-an-email", "name": "Broken"}))
        .send()
        .await
        .expect("Failed to reach customers endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_customer_list_pagination() {
    let client = logged_in_client().await;

    let resp = client
        .get(format!("{}/customers?limit=5&offset=0", admin_base_url()))
        .send()
        .await
        .expect("Failed to list customers");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let list = body.as_array().expect("expected an array");
    assert!(list.len() <= 5);
}
