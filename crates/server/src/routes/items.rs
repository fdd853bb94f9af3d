//! Versioned uniform resource: the full CRUD set under `/api/v1/items`,
//! backed by the same catalog services as the hand-written product routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use service::catalog::product_service::{
    self, ProductFilter, ProductInput, ProductOut, ProductUpdate,
};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(
    get, path = "/api/v1/items", tag = "items",
    params(ListParams),
    responses((status = 200, description = "Paginated item listing"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<ProductOut>>, JsonApiError> {
    let mut pagination = Pagination::default();
    if let Some(page) = params.page {
        pagination.page = page;
    }
    if let Some(per_page) = params.per_page {
        pagination.per_page = per_page;
    }
    match product_service::list_products(&state.db, &ProductFilter::default(), pagination).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => Err(JsonApiError::from_service(e, "list items")),
    }
}

#[utoipa::path(
    post, path = "/api/v1/items", tag = "items",
    request_body = crate::openapi::ProductInputDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductOut>, JsonApiError> {
    match product_service::create_product(&state.db, &input).await {
        Ok(p) => {
            info!(id = %p.id, "created item");
            Ok(Json(p))
        }
        Err(e) => Err(JsonApiError::from_service(e, "create item")),
    }
}

#[utoipa::path(
    get, path = "/api/v1/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductOut>, StatusCode> {
    match product_service::get_product(&state.db, id).await {
        Ok(Some(p)) => Ok(Json(p)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/api/v1/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = crate::openapi::ProductInputDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductOut>, JsonApiError> {
    let changes = ProductUpdate {
        name: Some(input.name),
        description: Some(input.description),
        price: Some(input.price),
        image: input.image,
        category_id: Some(input.category_id),
    };
    match product_service::update_product(&state.db, id, &changes).await {
        Ok(p) => Ok(Json(p)),
        Err(e) => Err(JsonApiError::from_service(e, "update item")),
    }
}

#[utoipa::path(
    patch, path = "/api/v1/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = crate::openapi::ProductUpdateDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<ProductUpdate>,
) -> Result<Json<ProductOut>, JsonApiError> {
    match product_service::update_product(&state.db, id, &changes).await {
        Ok(p) => Ok(Json(p)),
        Err(e) => Err(JsonApiError::from_service(e, "patch item")),
    }
}

#[utoipa::path(
    delete, path = "/api/v1/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> StatusCode {
    match product_service::delete_product(&state.db, id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete item failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
