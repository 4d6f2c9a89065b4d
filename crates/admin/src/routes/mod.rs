//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check (public)
//!
//! # Auth
//! POST   /auth/login                    - Password login (public)
//! POST   /auth/logout                   - Clear session
//! GET    /auth/me                       - Current principal
//! POST   /auth/password-reset           - Request reset link (public)
//! POST   /auth/password-reset/confirm   - Complete reset (public)
//! POST   /auth/verify-email/request     - Request verification link
//! POST   /auth/verify-email             - Complete verification (public)
//! POST   /auth/invites/accept           - Accept invite, create account (public)
//!
//! # Team users (admin only)
//! GET    /users                         - List team users
//! GET    /users/{id}                    - Team user detail
//! PUT    /users/{id}/role               - Change a user's role
//! DELETE /users/{id}                    - Remove a team user
//! GET    /invites                       - List invites
//! POST   /invites                       - Create and email an invite
//! DELETE /invites/{id}                  - Revoke a pending invite
//!
//! # Store collections (authenticated; deletions admin only)
//! GET    /customers                     - List customers
//! GET    /customers/{id}                - Customer detail
//! POST   /customers                     - Create customer
//! PUT    /customers/{id}                - Update customer
//! DELETE /customers/{id}                - Delete customer
//! (same shape for /orders, /products, /designs)
//! ```

pub mod auth;
pub mod customers;
pub mod designs;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

/// Build the full admin router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(customers::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(designs::router())
}

/// Pagination query parameters shared by list endpoints.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

impl Pagination {
    /// Resolve to a clamped `(limit, offset)` pair.
    #[must_use]
    pub fn resolve(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination {
            limit: None,
            offset: None,
        };
        assert_eq!(p.resolve(), (50, 0));
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(p.resolve(), (200, 0));

        let p = Pagination {
            limit: Some(0),
            offset: Some(30),
        };
        assert_eq!(p.resolve(), (1, 30));
    }
}
