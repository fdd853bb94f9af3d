use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::info;

use service::report;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(
    get, path = "/reports/catalog", tag = "reports",
    responses(
        (status = 200, description = "Workbook download"),
        (status = 400, description = "Empty catalog"),
        (status = 500, description = "Report Failed")
    )
)]
pub async fn download(State(state): State<ServerState>) -> Result<Response, JsonApiError> {
    let bytes = report::build_catalog_report(&state.db)
        .await
        .map_err(|e| JsonApiError::from_service(e, "catalog report"))?;

    info!(bytes = bytes.len(), "catalog report download");
    let disposition = format!("attachment; filename=\"{}\"", report::REPORT_FILENAME);
    let headers = [
        (header::CONTENT_TYPE, report::CONTENT_TYPE),
        (header::CONTENT_DISPOSITION, disposition.as_str()),
    ];
    Ok((headers, bytes).into_response())
}
