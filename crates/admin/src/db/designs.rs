//! Design repository for database operations.
//!
//! Designs are customer-owned artwork records referenced by orders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use inkpress_core::{CustomerId, DesignId};

use super::{RepositoryError, conflict_on_foreign_key};

/// A customer design record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Design {
    /// Unique identifier.
    pub id: DesignId,
    /// Customer who owns this design.
    pub customer_id: CustomerId,
    /// Design title.
    pub title: String,
    /// Where the artwork file lives.
    pub artwork_url: String,
    /// Optional production notes.
    pub notes: Option<String>,
    /// When the design was created.
    pub created_at: DateTime<Utc>,
    /// When the design was last updated.
    pub updated_at: DateTime<Utc>,
}

const DESIGN_COLUMNS: &str = "id, customer_id, title, artwork_url, notes, created_at, updated_at";

/// Repository for design database operations.
pub struct DesignRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DesignRepository<'a> {
    /// Create a new design repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List designs, newest first, optionally filtered by owning customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        customer_id: Option<CustomerId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Design>, RepositoryError> {
        let designs = sqlx::query_as(&format!(
            "SELECT {DESIGN_COLUMNS} FROM design \
             WHERE ($1::BIGINT IS NULL OR customer_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(customer_id.map(|id| id.as_i64()))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(designs)
    }

    /// Get a design by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: DesignId) -> Result<Option<Design>, RepositoryError> {
        let design = sqlx::query_as(&format!("SELECT {DESIGN_COLUMNS} FROM design WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        Ok(design)
    }

    /// Create a new design for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owning customer doesn't
    /// exist (foreign key violation).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        title: &str,
        artwork_url: &str,
        notes: Option<&str>,
    ) -> Result<Design, RepositoryError> {
        let design = sqlx::query_as(&format!(
            "INSERT INTO design (customer_id, title, artwork_url, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DESIGN_COLUMNS}"
        ))
        .bind(customer_id.as_i64())
        .bind(title)
        .bind(artwork_url)
        .bind(notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_foreign_key(e, "customer does not exist"))?;

        Ok(design)
    }

    /// Update a design's details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the design doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: DesignId,
        title: &str,
        artwork_url: &str,
        notes: Option<&str>,
    ) -> Result<Design, RepositoryError> {
        let design: Option<Design> = sqlx::query_as(&format!(
            "UPDATE design \
             SET title = $1, artwork_url = $2, notes = $3, updated_at = NOW() \
             WHERE id = $4 \
             RETURNING {DESIGN_COLUMNS}"
        ))
        .bind(title)
        .bind(artwork_url)
        .bind(notes)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        design.ok_or(RepositoryError::NotFound)
    }

    /// Delete a design by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the design doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: DesignId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM design WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
