//! Authentication error types.

use thiserror::Error;

use inkpress_core::Role;

use crate::db::RepositoryError;
use crate::error::AppError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] inkpress_core::EmailError),

    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A user already exists for this email.
    #[error("a user already exists for this email")]
    UserAlreadyExists,

    /// No invite matches the supplied token.
    #[error("invite not found")]
    InviteNotFound,

    /// The invite was already accepted.
    #[error("invite has already been used")]
    InviteAlreadyUsed,

    /// The invite expired before acceptance.
    #[error("invite has expired")]
    InviteExpired,

    /// The requested role cannot be assigned through an invite.
    #[error("role {0} cannot be assigned through an invite")]
    RoleNotInvitable(Role),

    /// No pending token matches.
    #[error("token not found")]
    TokenNotFound,

    /// The token expired before use.
    #[error("token has expired")]
    TokenExpired,

    /// Password fails the minimum-length policy.
    #[error("password must be at least {min} characters")]
    WeakPassword {
        /// Minimum allowed length.
        min: usize,
    },

    /// Password hashing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthServiceError::UserAlreadyExists => Self::Conflict(err.to_string()),
            AuthServiceError::InviteNotFound | AuthServiceError::TokenNotFound => {
                Self::NotFound(err.to_string())
            }
            AuthServiceError::InvalidEmail(_)
            | AuthServiceError::InviteAlreadyUsed
            | AuthServiceError::InviteExpired
            | AuthServiceError::RoleNotInvitable(_)
            | AuthServiceError::TokenExpired
            | AuthServiceError::WeakPassword { .. } => Self::BadRequest(err.to_string()),
            AuthServiceError::PasswordHash(msg) => Self::Internal(msg),
            AuthServiceError::Repository(e) => e.into(),
        }
    }
}
