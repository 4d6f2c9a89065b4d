//! Integration tests for Inkpress.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p inkpress-cli -- migrate
//!
//! # Start the admin server
//! cargo run -p inkpress-admin
//!
//! # Run integration tests
//! cargo test -p inkpress-integration-tests -- --ignored
//! ```
//!
//! The tests in `tests/` are `#[ignore]`d by default because they require a
//! running server with a live database. `ADMIN_BASE_URL` points them at the
//! server (default `http://localhost:3001`); `ADMIN_TEST_EMAIL` and
//! `ADMIN_TEST_PASSWORD` identify an existing admin account for the
//! authenticated flows.

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Admin credentials for authenticated test flows.
#[must_use]
pub fn admin_credentials() -> Option<(String, String)> {
    let email = std::env::var("ADMIN_TEST_EMAIL").ok()?;
    let password = std::env::var("ADMIN_TEST_PASSWORD").ok()?;
    Some((email, password))
}
