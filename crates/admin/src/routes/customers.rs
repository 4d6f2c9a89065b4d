//! Customer CRUD route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use inkpress_core::{CustomerId, Email};

use crate::db::CustomerRepository;
use crate::db::customers::Customer;
use crate::error::AppError;
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::state::AppState;

use super::Pagination;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/{id}", get(show).put(update).delete(remove))
}

/// Request body for creating or updating a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

/// List customers.
///
/// GET /customers
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let (limit, offset) = page.resolve();
    let customers = CustomerRepository::new(state.pool())
        .list(limit, offset)
        .await?;

    Ok(Json(customers))
}

/// Get a customer.
///
/// GET /customers/{id}
///
/// # Errors
///
/// Returns 404 if the customer doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(customer))
}

/// Create a customer.
///
/// POST /customers
///
/// # Errors
///
/// Returns 400 for a malformed email, 409 for a duplicate one.
#[instrument(skip_all, fields(email = %body.email))]
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let customer = CustomerRepository::new(state.pool())
        .create(&email, &body.name, body.phone.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer.
///
/// PUT /customers/{id}
///
/// # Errors
///
/// Returns 404 if the customer doesn't exist, 400 for a malformed email,
/// 409 for a duplicate one.
#[instrument(skip_all, fields(id = id))]
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let customer = CustomerRepository::new(state.pool())
        .update(CustomerId::new(id), &email, &body.name, body.phone.as_deref())
        .await?;

    Ok(Json(customer))
}

/// Delete a customer (admin only).
///
/// DELETE /customers/{id}
///
/// # Errors
///
/// Returns 404 if the customer doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CustomerRepository::new(state.pool())
        .delete(CustomerId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
