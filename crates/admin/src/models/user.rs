//! Team user domain types.
//!
//! These types represent validated domain objects for team authentication.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use inkpress_core::{Email, Role, UserId};

/// A team user: the principal behind every authenticated request.
///
/// The password hash is a PHC-format argon2 string; `SecretString` keeps it
/// out of `Debug` output. Reset and verification tokens are opaque,
/// single-use, and time-bound.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub name: String,
    /// User's role/permission level.
    pub role: Role,
    /// Whether the email address has been verified.
    pub verified: bool,
    /// Argon2 PHC-format password hash.
    pub password_hash: SecretString,
    /// Pending password-reset token, if one was requested.
    pub reset_token: Option<String>,
    /// Expiry of the pending password-reset token.
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    /// Pending email-verification token, if one was issued.
    pub verification_token: Option<String>,
    /// Expiry of the pending email-verification token.
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    /// When the user last logged in.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
