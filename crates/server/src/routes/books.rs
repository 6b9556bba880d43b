use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::books as book_service;
use tracing::{error, info};

use crate::{errors::JsonApiError, routes::ServerState};

/// Book payload for create/update. Missing fields deliberately default to the
/// empty string and fail trimming validation with a 400, rather than being
/// rejected as malformed JSON.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BookInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

fn map_error(op: &str, e: service::errors::ServiceError) -> JsonApiError {
    use service::errors::ServiceError;
    match e {
        ServiceError::Validation(_) => {
            JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
        }
        ServiceError::NotFound(_) => {
            JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
        }
        ServiceError::Db(_) => {
            error!(err = %e, op, "book operation failed");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
        }
    }
}

#[utoipa::path(
    get, path = "/books", tag = "books",
    responses(
        (status = 200, description = "All books, newest first"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<models::book::Model>>, JsonApiError> {
    match book_service::list_books(&state.db).await {
        Ok(list) => {
            info!(count = list.len(), "list books");
            Ok(Json(list))
        }
        Err(e) => Err(map_error("list", e)),
    }
}

#[utoipa::path(
    post, path = "/books", tag = "books",
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Option<Json<BookInput>>,
) -> Result<(StatusCode, Json<models::book::Model>), JsonApiError> {
    // Absent or non-JSON body behaves like an empty object
    let input = body.map(|Json(b)| b).unwrap_or_default();
    match book_service::create_book(&state.db, &input.title, &input.author).await {
        Ok(m) => {
            info!(id = m.id, title = %m.title, author = %m.author, "created book");
            Ok((StatusCode::CREATED, Json(m)))
        }
        Err(e) => Err(map_error("create", e)),
    }
}

#[utoipa::path(
    put, path = "/books/{id}", tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    body: Option<Json<BookInput>>,
) -> Result<Json<models::book::Model>, JsonApiError> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    match book_service::update_book(&state.db, id, &input.title, &input.author).await {
        Ok(m) => {
            info!(id = m.id, "updated book");
            Ok(Json(m))
        }
        Err(e) => Err(map_error("update", e)),
    }
}

#[utoipa::path(
    delete, path = "/books/{id}", tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match book_service::delete_book(&state.db, id).await {
        Ok(()) => {
            info!(id, "deleted book");
            Ok(Json(serde_json::json!({ "ok": true })))
        }
        Err(e) => Err(map_error("delete", e)),
    }
}
