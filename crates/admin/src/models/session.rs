//! Session-related types for team authentication.
//!
//! The session record is deliberately minimal: a principal identifier plus
//! cached role and auth-state. The full principal is re-resolved from the
//! user store on every protected request.

use serde::{Deserialize, Serialize};

use inkpress_core::{Role, UserId};

use super::user::User;

/// Authentication state stored in the server-side session.
///
/// A logged-out (or never-logged-in) session is the `Default` value: no
/// principal identifier, no role, not authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Identifier of the principal this session belongs to.
    pub user_id: Option<UserId>,
    /// Cached role of the principal at login time.
    pub role: Option<Role>,
    /// Whether this session has completed a login.
    pub authenticated: bool,
}

impl AuthSession {
    /// Session state for a freshly authenticated user.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: Some(user.id),
            role: Some(user.role),
            authenticated: true,
        }
    }

    /// Invalidate this session in place: drop the principal identifier,
    /// the cached role, and the authenticated flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any principal is referenced by this session.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.role.is_none() && !self.authenticated
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the [`AuthSession`](super::AuthSession) record.
    pub const AUTH: &str = "auth";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_logged_out() {
        let auth = AuthSession::default();
        assert!(auth.is_empty());
        assert_eq!(auth.user_id, None);
        assert_eq!(auth.role, None);
        assert!(!auth.authenticated);
    }

    #[test]
    fn test_clear_resets_all_fields() {
        let mut auth = AuthSession {
            user_id: Some(UserId::new(3)),
            role: Some(Role::Admin),
            authenticated: true,
        };
        auth.clear();
        assert!(auth.is_empty());
    }
}
