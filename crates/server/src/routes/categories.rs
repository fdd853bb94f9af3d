use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use common::pagination::{Page, Pagination};
use service::catalog::category_service::{self, CategoryOut};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    fn pagination(&self) -> Pagination {
        let mut pagination = Pagination::default();
        if let Some(page) = self.page {
            pagination.page = page;
        }
        if let Some(per_page) = self.per_page {
            pagination.per_page = per_page;
        }
        pagination
    }
}

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated category listing"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<CategoryOut>>, JsonApiError> {
    match category_service::list_categories(&state.db, params.pagination()).await {
        Ok(page) => {
            info!(count = page.results.len(), total = page.count, "list categories");
            Ok(Json(page))
        }
        Err(e) => Err(JsonApiError::from_service(e, "list categories")),
    }
}
