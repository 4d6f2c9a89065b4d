//! Team invite repository for database operations.
//!
//! Invites are the only way a staff account enters the system: an admin
//! creates one, the recipient accepts it with the emailed token.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use inkpress_core::{Email, InviteId, Role, UserId};

use super::{RepositoryError, conflict_on_unique};

/// Number of days an invite stays usable.
pub const INVITE_EXPIRY_DAYS: i32 = 7;

/// A team invite record.
#[derive(Debug, Clone)]
pub struct Invite {
    /// Unique identifier.
    pub id: InviteId,
    /// Email address that can accept this invite.
    pub email: Email,
    /// Display name for the new user.
    pub name: String,
    /// Role to assign when the invite is accepted.
    pub role: Role,
    /// Opaque acceptance token (emailed to the recipient).
    pub token: String,
    /// Admin who created this invite (None for CLI-created).
    pub invited_by: Option<UserId>,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
    /// When the invite expires.
    pub expires_at: DateTime<Utc>,
    /// When the invite was accepted (None if pending).
    pub used_at: Option<DateTime<Utc>>,
    /// User created when the invite was accepted.
    pub used_by: Option<UserId>,
}

impl Invite {
    /// Returns true if this invite has already been accepted.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Returns true if this invite has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Returns true if this invite can still be accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_used() && !self.is_expired()
    }
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct InviteRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    token: String,
    invited_by: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    used_by: Option<i64>,
}

impl TryFrom<InviteRow> for Invite {
    type Error = RepositoryError;

    fn try_from(row: InviteRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: InviteId::new(row.id),
            email,
            name: row.name,
            role,
            token: row.token,
            invited_by: row.invited_by.map(UserId::new),
            created_at: row.created_at,
            expires_at: row.expires_at,
            used_at: row.used_at,
            used_by: row.used_by.map(UserId::new),
        })
    }
}

const INVITE_COLUMNS: &str =
    "id, email, name, role, token, invited_by, created_at, expires_at, used_at, used_by";

/// Repository for team invite database operations.
pub struct InviteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InviteRepository<'a> {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all invites (pending and accepted), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Invite>, RepositoryError> {
        let rows: Vec<InviteRow> = sqlx::query_as(&format!(
            "SELECT {INVITE_COLUMNS} FROM team_invite ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an invite by its acceptance token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<Invite>, RepositoryError> {
        let row: Option<InviteRow> = sqlx::query_as(&format!(
            "SELECT {INVITE_COLUMNS} FROM team_invite WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an invite by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Invite>, RepositoryError> {
        let row: Option<InviteRow> = sqlx::query_as(&format!(
            "SELECT {INVITE_COLUMNS} FROM team_invite WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new invite expiring [`INVITE_EXPIRY_DAYS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an invite already exists for
    /// this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: Role,
        token: &str,
        invited_by: Option<UserId>,
    ) -> Result<Invite, RepositoryError> {
        let row: InviteRow = sqlx::query_as(&format!(
            "INSERT INTO team_invite (email, name, role, token, invited_by, expires_at) \
             VALUES ($1, $2, $3, $4, $5, NOW() + make_interval(days => $6)) \
             RETURNING {INVITE_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role.as_str())
        .bind(token)
        .bind(invited_by.map(|id| id.as_i64()))
        .bind(INVITE_EXPIRY_DAYS)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "invite already exists for this email"))?;

        row.try_into()
    }

    /// Mark an invite as accepted by a newly created user.
    ///
    /// Only pending invites can be marked; accepting twice is a `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no pending invite matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_used(&self, id: InviteId, used_by: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE team_invite SET used_at = NOW(), used_by = $1 \
             WHERE id = $2 AND used_at IS NULL",
        )
        .bind(used_by.as_i64())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an invite (admin revocation).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the invite doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: InviteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM team_invite WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete expired, never-accepted invites (cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM team_invite WHERE used_at IS NULL AND expires_at < NOW()")
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite(expires_at: DateTime<Utc>, used_at: Option<DateTime<Utc>>) -> Invite {
        Invite {
            id: InviteId::new(1),
            email: Email::parse("press@example.com").unwrap(),
            name: "Press Operator".to_string(),
            role: Role::TeamMember,
            token: "tok".to_string(),
            invited_by: Some(UserId::new(1)),
            created_at: Utc::now(),
            expires_at,
            used_at,
            used_by: used_at.map(|_| UserId::new(2)),
        }
    }

    #[test]
    fn test_pending_unexpired_invite_is_valid() {
        let i = invite(Utc::now() + Duration::days(3), None);
        assert!(i.is_valid());
        assert!(!i.is_used());
        assert!(!i.is_expired());
    }

    #[test]
    fn test_expired_invite_is_invalid() {
        let i = invite(Utc::now() - Duration::hours(1), None);
        assert!(i.is_expired());
        assert!(!i.is_valid());
    }

    #[test]
    fn test_used_invite_is_invalid() {
        let i = invite(Utc::now() + Duration::days(3), Some(Utc::now()));
        assert!(i.is_used());
        assert!(!i.is_valid());
    }
}
