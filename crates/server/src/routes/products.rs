use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use service::catalog::product_service::{
    self, ProductFilter, ProductInput, ProductOut, ProductSearch, ProductUpdate,
};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    pub category_id: Option<Uuid>,
    /// case-insensitive substring match on the product name
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    fn into_parts(self) -> (ProductFilter, Pagination) {
        let mut pagination = Pagination::default();
        if let Some(page) = self.page {
            pagination.page = page;
        }
        if let Some(per_page) = self.per_page {
            pagination.per_page = per_page;
        }
        let filter = ProductFilter {
            category_id: self.category_id,
            name: self.name,
            min_price: self.min_price,
            max_price: self.max_price,
        };
        (filter, pagination)
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub price: Option<Decimal>,
    /// free-text search over name, description and category name
    pub q: Option<String>,
    /// `id`, `name` or `price`, prefix with `-` for descending
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchParams {
    fn into_parts(self) -> (ProductSearch, Pagination) {
        let mut pagination = Pagination::default();
        if let Some(page) = self.page {
            pagination.page = page;
        }
        if let Some(per_page) = self.per_page {
            pagination.per_page = per_page;
        }
        let search = ProductSearch {
            category_id: self.category_id,
            category_name: self.category_name,
            price: self.price,
            q: self.q,
            ordering: self.ordering,
        };
        (search, pagination)
    }
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated product listing"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<ProductOut>>, JsonApiError> {
    let (filter, pagination) = params.into_parts();
    match product_service::list_products(&state.db, &filter, pagination).await {
        Ok(page) => {
            info!(count = page.results.len(), total = page.count, "list products");
            Ok(Json(page))
        }
        Err(e) => Err(JsonApiError::from_service(e, "list products")),
    }
}

#[utoipa::path(
    get, path = "/products/search", tag = "products",
    params(SearchParams),
    responses(
        (status = 200, description = "Filtered/searched/ordered product listing"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<ProductOut>>, JsonApiError> {
    let (search, pagination) = params.into_parts();
    match product_service::search_products(&state.db, &search, pagination).await {
        Ok(page) => {
            info!(count = page.results.len(), total = page.count, "search products");
            Ok(Json(page))
        }
        Err(e) => Err(JsonApiError::from_service(e, "search products")),
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductOut>, JsonApiError> {
    info!(name = %input.name, category_id = %input.category_id, "product_create_request");
    match product_service::create_product(&state.db, &input).await {
        Ok(p) => {
            info!(id = %p.id, category_id = %p.category.id, "created product");
            Ok(Json(p))
        }
        Err(e) => Err(JsonApiError::from_service(e, "create product")),
    }
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
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
    put, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
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
        Ok(p) => {
            info!(id = %p.id, "updated product");
            Ok(Json(p))
        }
        Err(e) => Err(JsonApiError::from_service(e, "update product")),
    }
}

#[utoipa::path(
    patch, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::ProductUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<ProductUpdate>,
) -> Result<Json<ProductOut>, JsonApiError> {
    match product_service::update_product(&state.db, id, &changes).await {
        Ok(p) => {
            info!(id = %p.id, "patched product");
            Ok(Json(p))
        }
        Err(e) => Err(JsonApiError::from_service(e, "patch product")),
    }
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> StatusCode {
    match product_service::delete_product(&state.db, id).await {
        Ok(true) => {
            info!(id = %id, "deleted product");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete product failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
