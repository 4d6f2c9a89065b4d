//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use inkpress_core::ProductId;

use super::{RepositoryError, conflict_on_unique};

/// A product in the print catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Longer product description.
    pub description: String,
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Unit price.
    pub price: Decimal,
    /// Whether the product is currently orderable.
    pub active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_COLUMNS: &str = "id, title, description, sku, price, active, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        sku: &str,
        price: Decimal,
        active: bool,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as(&format!(
            "INSERT INTO product (title, description, sku, price, active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(sku)
        .bind(price)
        .bind(active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "SKU already exists"))?;

        Ok(product)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the SKU is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        title: &str,
        description: &str,
        sku: &str,
        price: Decimal,
        active: bool,
    ) -> Result<Product, RepositoryError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "UPDATE product \
             SET title = $1, description = $2, sku = $3, price = $4, active = $5, \
                 updated_at = NOW() \
             WHERE id = $6 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(sku)
        .bind(price)
        .bind(active)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "SKU already exists"))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
