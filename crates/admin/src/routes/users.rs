//! Team user and invite management route handlers (admin only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use inkpress_core::{InviteId, Role, UserId};

use crate::db::invites::Invite;
use crate::db::{InviteRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Build the team management router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/{id}/role", put(update_role))
        .route("/invites", get(list_invites).post(create_invite))
        .route("/invites/{id}", delete(delete_invite))
}

/// Team user as exposed by the API.
///
/// Never carries the password hash or any pending token.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            name: user.name.clone(),
            role: user.role,
            verified: user.verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Invite as exposed by the API.
///
/// The acceptance token travels only in the invite email.
#[derive(Debug, Clone, Serialize)]
pub struct InviteResponse {
    pub id: InviteId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub invited_by: Option<UserId>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Invite> for InviteResponse {
    fn from(invite: &Invite) -> Self {
        Self {
            id: invite.id,
            email: invite.email.to_string(),
            name: invite.name.clone(),
            role: invite.role,
            invited_by: invite.invited_by,
            expires_at: invite.expires_at,
            used: invite.is_used(),
            created_at: invite.created_at,
        }
    }
}

/// List all team users.
///
/// GET /users
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get a team user.
///
/// GET /users/{id}
///
/// # Errors
///
/// Returns 404 if the user doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Change a team user's role.
///
/// PUT /users/{id}/role
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 409 when the change would demote
/// the last admin.
#[instrument(skip_all, fields(id = id, role = %body.role))]
async fn update_role(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let users = UserRepository::new(state.pool());
    let target = users
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    if target.is_admin() && body.role != Role::Admin {
        ensure_not_last_admin(&users).await?;
    }

    let updated = users.update_role(target.id, body.role).await?;
    tracing::info!(user_id = %updated.id, role = %updated.role, "role changed");

    Ok(Json(UserResponse::from(&updated)))
}

/// Remove a team user.
///
/// DELETE /users/{id}
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 400 for self-deletion, 409 when
/// the deletion would remove the last admin.
#[instrument(skip_all, fields(id = id))]
async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let target_id = UserId::new(id);
    if target_id == admin.id {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool());
    let target = users
        .get_by_id(target_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    if target.is_admin() {
        ensure_not_last_admin(&users).await?;
    }

    users.delete(target.id).await?;
    tracing::info!(user_id = %target.id, "team user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Refuse an operation that would leave the team without an admin.
async fn ensure_not_last_admin(users: &UserRepository<'_>) -> Result<(), AppError> {
    let admins = users.count_by_role(Role::Admin).await?;
    if admins <= 1 {
        return Err(AppError::Conflict(
            "cannot remove the last admin".to_string(),
        ));
    }
    Ok(())
}

/// List all invites.
///
/// GET /invites
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list_invites(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<InviteResponse>>, AppError> {
    let invites = InviteRepository::new(state.pool()).list_all().await?;
    Ok(Json(invites.iter().map(InviteResponse::from).collect()))
}

/// Request body for creating an invite.
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Create an invite and email its acceptance link.
///
/// POST /invites
///
/// # Errors
///
/// Returns 400 for the `user` role or a malformed email, 409 if the email
/// already has an account or a pending invite.
#[instrument(skip_all, fields(email = %body.email, role = %body.role))]
async fn create_invite(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), AppError> {
    let auth = AuthService::new(state.pool());
    let invite = auth
        .create_invite(&body.email, &body.name, body.role, Some(admin.id))
        .await?;

    let accept_url = format!(
        "{}/auth/invites/accept?token={}",
        state.config().base_url,
        invite.token
    );
    state
        .email()
        .send_invite(invite.email.as_str(), &invite.name, &accept_url)
        .await?;

    tracing::info!(invite_id = %invite.id, "invite created");
    Ok((StatusCode::CREATED, Json(InviteResponse::from(&invite))))
}

/// Revoke a pending invite.
///
/// DELETE /invites/{id}
///
/// # Errors
///
/// Returns 404 if the invite doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn delete_invite(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    InviteRepository::new(state.pool())
        .delete(InviteId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
