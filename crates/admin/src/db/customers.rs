//! Customer repository for database operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use inkpress_core::{CustomerId, Email};

use super::{RepositoryError, conflict_on_unique};

/// A customer record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,
    /// Customer's email address (unique).
    pub email: Email,
    /// Customer's display name.
    pub name: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

const CUSTOMER_COLUMNS: &str = "id, email, name, phone, created_at, updated_at";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as(&format!(
            "INSERT INTO customer (email, name, phone) \
             VALUES ($1, $2, $3) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "customer email already exists"))?;

        Ok(customer)
    }

    /// Update a customer's contact details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        email: &Email,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Customer, RepositoryError> {
        let customer: Option<Customer> = sqlx::query_as(&format!(
            "UPDATE customer SET email = $1, name = $2, phone = $3, updated_at = NOW() \
             WHERE id = $4 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(phone)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "customer email already exists"))?;

        customer.ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
