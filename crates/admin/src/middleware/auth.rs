//! Authentication middleware and extractors.
//!
//! Every protected route goes through [`authenticate`]: the session's
//! principal identifier is re-resolved against the user store on each
//! request, so role changes and deletions take effect immediately. A session
//! pointing at a principal that no longer exists is invalidated in place
//! before the request is rejected.

use std::future::Future;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use inkpress_core::{Role, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{AuthSession, User, session_keys};
use crate::state::AppState;

/// Rejection message when no usable session is present.
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";
/// Rejection message when the session references a missing principal.
pub const MSG_USER_NOT_FOUND: &str = "User not found";
/// Rejection message for the admin-only gate.
pub const MSG_ADMIN_REQUIRED: &str = "Admin access required";

/// The role set accepted by [`RequireAdmin`].
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Lookup seam between the guard and the persistent user store.
///
/// Implemented by [`UserRepository`] in production and by in-memory fakes in
/// tests.
pub trait PrincipalStore {
    /// Resolve a principal by identifier.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

impl PrincipalStore for UserRepository<'_> {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.get_by_id(id).await
    }
}

/// Rejection returned when a request fails the guard.
///
/// `Unauthenticated` and `Forbidden` are the guard's own failure kinds;
/// `Internal` is the surrounding glue's mapping for store failures, which
/// are not an authorization outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// No usable session, or the session points at a missing principal (401).
    Unauthenticated(&'static str),
    /// Valid session, but the principal's role lacks the capability (403).
    Forbidden(String),
    /// Principal lookup failed at the store level (500).
    Internal,
}

/// JSON body returned for guard rejections.
#[derive(Serialize)]
struct RejectionBody {
    error: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.to_owned()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
        };

        (status, Json(RejectionBody { error: message })).into_response()
    }
}

/// Validate the session state against the user store.
///
/// Checks run in order:
/// 1. No principal identifier in the session: reject `Unauthenticated`
///    without touching the store.
/// 2. Identifier present but the principal is gone: clear `auth` in place
///    (the caller persists the cleared state) and reject `Unauthenticated`.
/// 3. Otherwise return the full principal record.
///
/// # Errors
///
/// Returns `AuthRejection::Unauthenticated` as described above, or
/// `AuthRejection::Internal` if the store lookup itself fails.
pub async fn authenticate<S: PrincipalStore>(
    auth: &mut AuthSession,
    store: &S,
) -> Result<User, AuthRejection> {
    let Some(user_id) = auth.user_id else {
        return Err(AuthRejection::Unauthenticated(MSG_NOT_AUTHENTICATED));
    };

    match store.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            auth.clear();
            Err(AuthRejection::Unauthenticated(MSG_USER_NOT_FOUND))
        }
        Err(err) => {
            tracing::error!(error = %err, user_id = %user_id, "principal lookup failed");
            Err(AuthRejection::Internal)
        }
    }
}

/// Gate an authenticated principal on a required role set.
///
/// # Errors
///
/// Returns `AuthRejection::Forbidden` naming every required role (joined
/// with "or") if the principal's role is not a member of `required`.
pub fn require_role(user: &User, required: &[Role]) -> Result<(), AuthRejection> {
    if required.contains(&user.role) {
        return Ok(());
    }

    let roles = required
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(AuthRejection::Forbidden(format!(
        "Access denied. Required role: {roles}"
    )))
}

/// Extractor that requires an authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthenticated(MSG_NOT_AUTHENTICATED))?;

        let mut auth: AuthSession = session
            .get(session_keys::AUTH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let before = auth.clone();

        let state = AppState::from_ref(state);
        let users = UserRepository::new(state.pool());
        let result = authenticate(&mut auth, &users).await;

        // Persist the invalidated session so a client holding a dangling
        // identifier does not retry the lookup on every request.
        if auth != before
            && let Err(err) = session.insert(session_keys::AUTH, &auth).await
        {
            tracing::warn!(error = %err, "failed to persist invalidated session");
        }

        result.map(Self)
    }
}

/// Extractor that requires an authenticated principal with the admin role.
///
/// Authentication failures reject exactly like [`RequireAuth`]; a resolved
/// non-admin principal is rejected with 403 "Admin access required".
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if require_role(&user, ADMIN_ONLY).is_err() {
            return Err(AuthRejection::Forbidden(MSG_ADMIN_REQUIRED.to_owned()));
        }

        Ok(Self(user))
    }
}

/// Write a fresh login into the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_session(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::AUTH, AuthSession::for_user(user))
        .await
}

/// Clear the authentication state from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<AuthSession>(session_keys::AUTH).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use secrecy::SecretString;

    use inkpress_core::Email;

    use super::*;

    /// In-memory principal store counting lookups.
    struct MemoryStore {
        users: HashMap<i64, User>,
        lookups: AtomicUsize,
    }

    impl MemoryStore {
        fn new(users: impl IntoIterator<Item = User>) -> Self {
            Self {
                users: users.into_iter().map(|u| (u.id.as_i64(), u)).collect(),
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl PrincipalStore for MemoryStore {
        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.get(&id.as_i64()).cloned())
        }
    }

    /// A store whose lookups always fail.
    struct BrokenStore;

    impl PrincipalStore for BrokenStore {
        async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn user(id: i64, role: Role) -> User {
        User {
            id: UserId::new(id),
            email: Email::parse(&format!("user{id}@example.com")).unwrap(),
            name: format!("User {id}"),
            role,
            verified: true,
            password_hash: SecretString::from("$argon2id$test"),
            reset_token: None,
            reset_token_expires_at: None,
            verification_token: None,
            verification_token_expires_at: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn session_for(id: i64) -> AuthSession {
        AuthSession {
            user_id: Some(UserId::new(id)),
            role: Some(Role::User),
            authenticated: true,
        }
    }

    #[tokio::test]
    async fn test_empty_session_rejected_without_lookup() {
        let store = MemoryStore::new([user(1, Role::Admin)]);
        let mut auth = AuthSession::default();

        let result = authenticate(&mut auth, &store).await;

        assert_eq!(
            result.unwrap_err(),
            AuthRejection::Unauthenticated(MSG_NOT_AUTHENTICATED)
        );
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_resolvable_principal_is_attached() {
        let store = MemoryStore::new([user(1, Role::Admin)]);
        let mut auth = session_for(1);
        let before = auth.clone();

        let resolved = authenticate(&mut auth, &store).await.unwrap();

        assert_eq!(resolved.id, UserId::new(1));
        assert_eq!(resolved.email.as_str(), "user1@example.com");
        // Success leaves the session untouched.
        assert_eq!(auth, before);
    }

    #[tokio::test]
    async fn test_dangling_principal_clears_session() {
        let store = MemoryStore::new([user(1, Role::Admin)]);
        let mut auth = session_for(2);

        let result = authenticate(&mut auth, &store).await;

        assert_eq!(
            result.unwrap_err(),
            AuthRejection::Unauthenticated(MSG_USER_NOT_FOUND)
        );
        assert_eq!(auth.user_id, None);
        assert_eq!(auth.role, None);
        assert!(!auth.authenticated);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_not_unauthenticated() {
        let mut auth = session_for(1);
        let before = auth.clone();

        let result = authenticate(&mut auth, &BrokenStore).await;

        assert_eq!(result.unwrap_err(), AuthRejection::Internal);
        // A store failure is not evidence the session is stale.
        assert_eq!(auth, before);
    }

    #[tokio::test]
    async fn test_admin_session_passes_admin_gate() {
        let store = MemoryStore::new([user(1, Role::Admin)]);
        let mut auth = session_for(1);

        let resolved = authenticate(&mut auth, &store).await.unwrap();
        assert!(require_role(&resolved, &[Role::Admin]).is_ok());
    }

    #[test]
    fn test_require_role_denies_with_role_name() {
        let u = user(3, Role::User);
        let err = require_role(&u, &[Role::Admin]).unwrap_err();
        assert_eq!(
            err,
            AuthRejection::Forbidden("Access denied. Required role: admin".to_string())
        );
    }

    #[test]
    fn test_require_role_joins_multiple_roles_with_or() {
        let u = user(3, Role::User);
        let err = require_role(&u, &[Role::Admin, Role::TeamMember]).unwrap_err();
        assert_eq!(
            err,
            AuthRejection::Forbidden(
                "Access denied. Required role: admin or team-member".to_string()
            )
        );
    }

    #[test]
    fn test_require_role_passes_member_of_set() {
        let u = user(4, Role::TeamMember);
        assert!(require_role(&u, &[Role::Admin, Role::TeamMember]).is_ok());
        assert!(require_role(&u, &[Role::TeamMember]).is_ok());
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::Unauthenticated(MSG_NOT_AUTHENTICATED)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden(MSG_ADMIN_REQUIRED.to_owned())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthRejection::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
