use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{Author, AuthorPayload};
use super::service::AuthorService;

/// List all authors
#[utoipa::path(
    get,
    path = "/api/authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    ),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>, AppError> {
    let authors = AuthorService::get_authors(&state.db, None, None).await?;
    Ok(Json(authors))
}

/// Get a single author
#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    tag = "Authors"
)]
#[instrument(skip(state))]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Author>, AppError> {
    let author = AuthorService::get_author_by_id(&state.db, id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/api/authors",
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn create_author(
    State(state): State<AppState>,
    _user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<AuthorPayload>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let author = AuthorService::create_author(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    tag = "Authors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn update_author(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<AuthorPayload>,
) -> Result<Json<Author>, AppError> {
    let author = AuthorService::update_author(&state.db, id, dto).await?;
    Ok(Json(author))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    tag = "Authors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn delete_author(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    AuthorService::delete_author(&state.db, id).await?;
    Ok(Json(json!({"message": "Author deleted successfully"})))
}
