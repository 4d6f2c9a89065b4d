//! Team invite management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an invite for the first admin (no inviter on record)
//! inkpress-cli invite create -e admin@example.com -n "Admin Name" -r admin
//!
//! # Prune invites that expired without being accepted
//! inkpress-cli invite cleanup
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string
//! - `ADMIN_BASE_URL` - Base URL for the printed acceptance link

use thiserror::Error;

use inkpress_admin::db::{InviteRepository, RepositoryError, UserRepository};
use inkpress_admin::services::auth::generate_token;
use inkpress_core::{Email, EmailError, Role};

/// Errors that can occur during invite operations.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, team-member")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// User already exists.
    #[error("A team user already exists with email: {0}")]
    UserExists(String),
}

/// Create a new team invite and print its acceptance link.
///
/// # Errors
///
/// Returns `InviteError` for invalid input, a duplicate user/invite, or a
/// store failure.
pub async fn create(email: &str, name: &str, role: &str) -> Result<(), InviteError> {
    dotenvy::dotenv().ok();

    // Parse and validate inputs before touching the database
    let role: Role = role
        .parse()
        .map_err(|_| InviteError::InvalidRole(role.to_owned()))?;
    if !role.is_invitable() {
        return Err(InviteError::InvalidRole(role.to_string()));
    }
    let email = Email::parse(email)?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| InviteError::MissingEnvVar("ADMIN_DATABASE_URL"))?;
    let base_url = std::env::var("ADMIN_BASE_URL")
        .map_err(|_| InviteError::MissingEnvVar("ADMIN_BASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    let pool = sqlx::PgPool::connect(&database_url).await?;

    if UserRepository::new(&pool).get_by_email(&email).await?.is_some() {
        return Err(InviteError::UserExists(email.to_string()));
    }

    let token = generate_token();
    let invite = InviteRepository::new(&pool)
        .create(&email, name, role, &token, None)
        .await?;

    tracing::info!(
        invite_id = %invite.id,
        email = %invite.email,
        role = %invite.role,
        expires_at = %invite.expires_at,
        "Invite created"
    );
    tracing::info!(
        "Acceptance link: {base_url}/auth/invites/accept?token={token}"
    );

    Ok(())
}

/// Delete expired, never-accepted invites.
///
/// # Errors
///
/// Returns `InviteError` if the database is unreachable.
pub async fn cleanup() -> Result<(), InviteError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| InviteError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    let pool = sqlx::PgPool::connect(&database_url).await?;

    let removed = InviteRepository::new(&pool).delete_expired().await?;
    tracing::info!(removed, "Expired invites deleted");

    Ok(())
}
