use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(utoipa::ToSchema)]
pub struct ProductInputDoc {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: Option<String>,
    pub category_id: Uuid,
}

#[derive(utoipa::ToSchema)]
pub struct ProductUpdateDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::products::list,
        crate::routes::products::search,
        crate::routes::products::create,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::patch,
        crate::routes::products::delete,
        crate::routes::categories::list,
        crate::routes::items::list,
        crate::routes::items::create,
        crate::routes::items::get,
        crate::routes::items::update,
        crate::routes::items::patch,
        crate::routes::items::delete,
        crate::routes::report::download,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProductInputDoc,
            ProductUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "categories"),
        (name = "items"),
        (name = "reports")
    )
)]
pub struct ApiDoc;
