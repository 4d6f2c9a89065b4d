//! Authentication service.
//!
//! Password login, team invites, password reset, and email verification.
//! Tokens are opaque CSPRNG strings; all of them are single-use and
//! time-bound, with expiry enforced here rather than in the store.

mod error;

pub use error::AuthServiceError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use inkpress_core::{Email, Role, UserId};

use crate::db::invites::Invite;
use crate::db::{InviteRepository, RepositoryError, UserRepository};
use crate::models::User;

/// How long a password-reset token stays valid.
const RESET_TOKEN_EXPIRY_HOURS: i64 = 1;

/// How long an email-verification token stays valid.
const VERIFICATION_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service over the user and invite repositories.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    invites: InviteRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            invites: InviteRepository::new(pool),
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Authenticate an email/password pair.
    ///
    /// Unknown email and wrong password both fail with
    /// `InvalidCredentials`: the caller cannot probe which emails exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::InvalidCredentials` on any mismatch, or
    /// `AuthServiceError::Repository` if the store fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthServiceError> {
        let email = Email::parse(email).map_err(|_| AuthServiceError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(password, user.password_hash.expose_secret()) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.users.record_login(user.id).await?;

        Ok(user)
    }

    // =========================================================================
    // Invites
    // =========================================================================

    /// Create a team invite with a fresh acceptance token.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::RoleNotInvitable` for the `user` role,
    /// `AuthServiceError::UserAlreadyExists` if the email already has an
    /// account, or `AuthServiceError::Repository` for conflicts and store
    /// failures.
    pub async fn create_invite(
        &self,
        email: &str,
        name: &str,
        role: Role,
        invited_by: Option<UserId>,
    ) -> Result<Invite, AuthServiceError> {
        let email = Email::parse(email)?;

        if !role.is_invitable() {
            return Err(AuthServiceError::RoleNotInvitable(role));
        }

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::UserAlreadyExists);
        }

        let token = generate_token();
        let invite = self
            .invites
            .create(&email, name, role, &token, invited_by)
            .await?;

        Ok(invite)
    }

    /// Accept an invite, creating the team user it provisions.
    ///
    /// The created account is marked verified: possession of the emailed
    /// token proves mailbox ownership.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::InviteNotFound`, `InviteAlreadyUsed`, or
    /// `InviteExpired` for unusable tokens; `WeakPassword` for a too-short
    /// password; `UserAlreadyExists` if the email got an account since the
    /// invite was issued.
    pub async fn accept_invite(
        &self,
        token: &str,
        password: &str,
    ) -> Result<User, AuthServiceError> {
        let invite = self
            .invites
            .get_by_token(token)
            .await?
            .ok_or(AuthServiceError::InviteNotFound)?;

        if invite.is_used() {
            return Err(AuthServiceError::InviteAlreadyUsed);
        }
        if invite.is_expired() {
            return Err(AuthServiceError::InviteExpired);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&invite.email, &invite.name, invite.role, &password_hash, true)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthServiceError::UserAlreadyExists,
                other => AuthServiceError::Repository(other),
            })?;

        self.invites.mark_used(invite.id, user.id).await?;

        Ok(user)
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Issue a password-reset token for the given email.
    ///
    /// Returns `Ok(None)` for unknown emails so the route can answer 202
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::InvalidEmail` for malformed input, or
    /// `AuthServiceError::Repository` if the store fails.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthServiceError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_EXPIRY_HOURS);
        self.users
            .set_reset_token(user.id, &token, expires_at)
            .await?;

        Ok(Some((user, token)))
    }

    /// Complete a password reset.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::TokenNotFound` or `TokenExpired` for
    /// unusable tokens, `WeakPassword` for a too-short password.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .get_by_reset_token(token)
            .await?
            .ok_or(AuthServiceError::TokenNotFound)?;

        if token_expired(user.reset_token_expires_at) {
            return Err(AuthServiceError::TokenExpired);
        }

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        // Also clears the reset token: single use.
        self.users.set_password(user.id, &password_hash).await?;

        Ok(())
    }

    // =========================================================================
    // Email verification
    // =========================================================================

    /// Issue an email-verification token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::Repository` if the store fails.
    pub async fn request_email_verification(
        &self,
        user_id: UserId,
    ) -> Result<String, AuthServiceError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TOKEN_EXPIRY_HOURS);
        self.users
            .set_verification_token(user_id, &token, expires_at)
            .await?;

        Ok(token)
    }

    /// Complete email verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::TokenNotFound` or `TokenExpired` for
    /// unusable tokens.
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .get_by_verification_token(token)
            .await?
            .ok_or(AuthServiceError::TokenNotFound)?;

        if token_expired(user.verification_token_expires_at) {
            return Err(AuthServiceError::TokenExpired);
        }

        self.users.mark_verified(user.id).await?;

        Ok(())
    }
}

// =============================================================================
// Token and password primitives
// =============================================================================

/// Generate an opaque URL-safe token (32 CSPRNG bytes, base64, no padding).
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Whether a stored token expiry has passed.
///
/// A token without an expiry on record is treated as expired: it should not
/// exist, and failing closed is the only safe reading.
fn token_expired(expires_at: Option<DateTime<Utc>>) -> bool {
    expires_at.is_none_or(|at| Utc::now() > at)
}

/// Enforce the minimum password length.
fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthServiceError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password into a PHC-format argon2 string.
fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::PasswordHash(e.to_string()))
}

/// Verify a password against a PHC-format argon2 hash.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong horse battery", &hash));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("correct horse battery").unwrap();
        let b = hash_password("correct horse battery").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_token_expiry() {
        assert!(token_expired(None));
        assert!(token_expired(Some(Utc::now() - Duration::minutes(1))));
        assert!(!token_expired(Some(Utc::now() + Duration::minutes(1))));
    }
}
