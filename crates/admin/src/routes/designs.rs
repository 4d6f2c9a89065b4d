//! Design CRUD route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use inkpress_core::{CustomerId, DesignId};

use crate::db::DesignRepository;
use crate::db::designs::Design;
use crate::error::AppError;
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::state::AppState;

use super::Pagination;

/// Build the designs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/designs", get(list).post(create))
        .route("/designs/{id}", get(show).put(update).delete(remove))
}

/// List query: pagination plus an optional owning-customer filter.
#[derive(Debug, Deserialize)]
pub struct DesignListQuery {
    pub customer_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl DesignListQuery {
    fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Request body for creating a design.
#[derive(Debug, Deserialize)]
pub struct CreateDesignRequest {
    pub customer_id: i64,
    pub title: String,
    pub artwork_url: String,
    pub notes: Option<String>,
}

/// Request body for updating a design.
///
/// Ownership is fixed at creation; only the content fields move.
#[derive(Debug, Deserialize)]
pub struct UpdateDesignRequest {
    pub title: String,
    pub artwork_url: String,
    pub notes: Option<String>,
}

/// List designs.
///
/// GET /designs
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip_all)]
async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<DesignListQuery>,
) -> Result<Json<Vec<Design>>, AppError> {
    let (limit, offset) = query.page().resolve();
    let designs = DesignRepository::new(state.pool())
        .list(query.customer_id.map(CustomerId::new), limit, offset)
        .await?;

    Ok(Json(designs))
}

/// Get a design.
///
/// GET /designs/{id}
///
/// # Errors
///
/// Returns 404 if the design doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Design>, AppError> {
    let design = DesignRepository::new(state.pool())
        .get_by_id(DesignId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("design {id}")))?;

    Ok(Json(design))
}

/// Create a design.
///
/// POST /designs
///
/// # Errors
///
/// Returns 409 if the owning customer doesn't exist.
#[instrument(skip_all, fields(customer_id = body.customer_id))]
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateDesignRequest>,
) -> Result<(StatusCode, Json<Design>), AppError> {
    let design = DesignRepository::new(state.pool())
        .create(
            CustomerId::new(body.customer_id),
            &body.title,
            &body.artwork_url,
            body.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(design)))
}

/// Update a design.
///
/// PUT /designs/{id}
///
/// # Errors
///
/// Returns 404 if the design doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateDesignRequest>,
) -> Result<Json<Design>, AppError> {
    let design = DesignRepository::new(state.pool())
        .update(
            DesignId::new(id),
            &body.title,
            &body.artwork_url,
            body.notes.as_deref(),
        )
        .await?;

    Ok(Json(design))
}

/// Delete a design (admin only).
///
/// DELETE /designs/{id}
///
/// # Errors
///
/// Returns 404 if the design doesn't exist.
#[instrument(skip_all, fields(id = id))]
async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    DesignRepository::new(state.pool())
        .delete(DesignId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
