//! Product CRUD route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use inkpress_core::ProductId;

use crate::db::ProductRepository;
use crate::db::products::Product;
use crate::error::AppError;
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::state::AppState;

use super::Pagination;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).put(update).delete(remove))
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub title: String,
    pub description: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// List products.
///
/// GET /products
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>, AppError> {
    let (limit, offset) = page.resolve();
    let products = ProductRepository::new(state.pool())
        .list(limit, offset)
        .await?;

    Ok(Json(products))
}

/// Get a product.
///
/// GET /products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
///
/// POST /products
///
/// # Errors
///
/// Returns 400 for a negative price, 409 for a duplicate SKU.
#[instrument(skip_all, fields(sku = %body.sku))]
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    validate_price(body.price)?;

    let product = ProductRepository::new(state.pool())
        .create(
            &body.title,
            &body.description,
            &body.sku,
            body.price,
            body.active,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
///
/// PUT /products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist, 400 for a negative price,
/// 409 for a duplicate SKU.
#[instrument(skip_all, fields(id = id))]
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    validate_price(body.price)?;

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            &body.title,
            &body.description,
            &body.sku,
            body.price,
            body.active,
        )
        .await?;

    Ok(Json(product))
}

/// Delete a product (admin only).
///
/// DELETE /products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    Ok(())
}
