//! Authentication route handlers.
//!
//! Login/logout plus the public token flows: invite acceptance, password
//! reset, and email verification.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::auth::{RequireAuth, clear_session, establish_session};
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::users::UserResponse;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me).put(update_me))
        .route("/auth/password-reset", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
        .route("/auth/verify-email/request", post(request_email_verification))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/invites/accept", post(accept_invite))
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password login.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns 401 for unknown email or wrong password.
#[instrument(skip_all, fields(email = %body.email))]
async fn login(
    session: Session,
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    establish_session(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, "login");
    Ok(Json(UserResponse::from(&user)))
}

/// Logout and clear the session.
///
/// POST /auth/logout
async fn logout(session: Session) -> StatusCode {
    let _ = clear_session(&session).await;
    StatusCode::NO_CONTENT
}

/// Return the current principal.
///
/// GET /auth/me
async fn me(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Request body for a profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// Update the current principal's display name.
///
/// PUT /auth/me
///
/// # Errors
///
/// Returns 400 for an empty name.
#[instrument(skip_all, fields(user_id = %user.id))]
async fn update_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let updated = UserRepository::new(state.pool())
        .update_name(user.id, name)
        .await?;

    Ok(Json(UserResponse::from(&updated)))
}

/// Request body for a password-reset request.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Request a password-reset link.
///
/// POST /auth/password-reset
///
/// Always answers 202 for well-formed emails, whether or not an account
/// exists.
///
/// # Errors
///
/// Returns 400 for a malformed email address.
#[instrument(skip_all)]
async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<StatusCode, AppError> {
    let auth = AuthService::new(state.pool());

    if let Some((user, token)) = auth.request_password_reset(&body.email).await? {
        let reset_url = format!(
            "{}/auth/password-reset/confirm?token={token}",
            state.config().base_url
        );
        state
            .email()
            .send_password_reset(user.email.as_str(), &reset_url)
            .await?;
    }

    Ok(StatusCode::ACCEPTED)
}

/// Request body for completing a password reset.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub password: String,
}

/// Complete a password reset.
///
/// POST /auth/password-reset/confirm
///
/// # Errors
///
/// Returns 404 for an unknown token, 400 for an expired one or a weak
/// password.
#[instrument(skip_all)]
async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> Result<StatusCode, AppError> {
    let auth = AuthService::new(state.pool());
    auth.reset_password(&body.token, &body.password).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request an email-verification link for the current principal.
///
/// POST /auth/verify-email/request
///
/// # Errors
///
/// Returns 502 if the email cannot be sent.
#[instrument(skip_all, fields(user_id = %user.id))]
async fn request_email_verification(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if user.verified {
        return Ok(StatusCode::NO_CONTENT);
    }

    let auth = AuthService::new(state.pool());
    let token = auth.request_email_verification(user.id).await?;

    let verify_url = format!("{}/auth/verify-email?token={token}", state.config().base_url);
    state
        .email()
        .send_email_verification(user.email.as_str(), &verify_url)
        .await?;

    Ok(StatusCode::ACCEPTED)
}

/// Request body for completing email verification.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Complete email verification.
///
/// POST /auth/verify-email
///
/// # Errors
///
/// Returns 404 for an unknown token, 400 for an expired one.
#[instrument(skip_all)]
async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<StatusCode, AppError> {
    let auth = AuthService::new(state.pool());
    auth.verify_email(&body.token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request body for accepting an invite.
#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
    pub password: String,
}

/// Accept an invite and create the team account it provisions.
///
/// POST /auth/invites/accept
///
/// # Errors
///
/// Returns 404 for an unknown token, 400 for a used/expired invite or weak
/// password, 409 if the email already has an account.
#[instrument(skip_all)]
async fn accept_invite(
    session: Session,
    State(state): State<AppState>,
    Json(body): Json<AcceptInviteRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.accept_invite(&body.token, &body.password).await?;

    // Log the new user straight in.
    establish_session(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, role = %user.role, "invite accepted");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
