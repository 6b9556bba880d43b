use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct BookInputDoc {
    pub title: String,
    pub author: String,
}

#[derive(ToSchema)]
pub struct BookDoc {
    pub id: i32,
    pub title: String,
    pub author: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::books::list,
        crate::routes::books::create,
        crate::routes::books::update,
        crate::routes::books::delete,
    ),
    components(
        schemas(
            HealthResponse,
            BookInputDoc,
            BookDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "books")
    )
)]
pub struct ApiDoc;
