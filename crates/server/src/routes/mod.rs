use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod categories;
pub mod items;
pub mod products;
pub mod report;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: open reads, bearer-protected writes.
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    // Hand-written catalog views
    let catalog = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/search", get(products::search))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .patch(products::patch)
                .delete(products::delete),
        )
        .route("/categories", get(categories::list))
        .route("/reports/catalog", get(report::download));

    // Versioned uniform resource registration
    let items_api = Router::new()
        .route("/api/v1/items", get(items::list).post(items::create))
        .route(
            "/api/v1/items/:id",
            get(items::get).put(items::update).patch(items::patch).delete(items::delete),
        );

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let docs = SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    // Compose
    Router::new()
        .route("/health", get(health))
        .merge(catalog)
        .merge(items_api)
        .merge(auth_routes)
        .merge(docs)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One span per request with method and path, at INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // Response line includes status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and friends are logged as errors
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
