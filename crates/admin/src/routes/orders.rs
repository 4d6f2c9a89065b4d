//! Order CRUD route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use inkpress_core::{CustomerId, DesignId, OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::db::orders::Order;
use crate::error::AppError;
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::state::AppState;

use super::Pagination;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/{id}", get(show).put(update).delete(remove))
}

/// List query: pagination plus an optional customer filter.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub customer_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl OrderListQuery {
    fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub design_id: Option<i64>,
    pub total: Decimal,
}

/// Request body for updating an order.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
    pub total: Decimal,
}

/// List orders.
///
/// GET /orders
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let (limit, offset) = query.page().resolve();
    let orders = OrderRepository::new(state.pool())
        .list(query.customer_id.map(CustomerId::new), limit, offset)
        .await?;

    Ok(Json(orders))
}

/// Get an order.
///
/// GET /orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}

/// Create an order in `pending` status.
///
/// POST /orders
///
/// # Errors
///
/// Returns 400 for a negative total, 409 if the customer or design doesn't
/// exist.
#[instrument(skip_all, fields(customer_id = body.customer_id))]
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    validate_total(body.total)?;

    let order = OrderRepository::new(state.pool())
        .create(
            CustomerId::new(body.customer_id),
            body.design_id.map(DesignId::new),
            body.total,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order's status and total.
///
/// PUT /orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist, 400 for a negative total.
#[instrument(skip_all, fields(id = id, status = %body.status))]
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    validate_total(body.total)?;

    let order = OrderRepository::new(state.pool())
        .update(OrderId::new(id), body.status, body.total)
        .await?;

    Ok(Json(order))
}

/// Delete an order (admin only).
///
/// DELETE /orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    OrderRepository::new(state.pool())
        .delete(OrderId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_total(total: Decimal) -> Result<(), AppError> {
    if total.is_sign_negative() {
        return Err(AppError::BadRequest("total cannot be negative".to_string()));
    }
    Ok(())
}
