use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};
use utoipa::IntoParams;

use crate::middleware::auth::CurrentUser;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{Book, CreateBookDto, UpdateBookDto};
use super::query::{BookQuery, BookQueryParams};
use super::service::BookService;
use super::transfer;

/// List books with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/books",
    params(BookQueryParams),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 400, description = "Invalid sort field or order", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookQueryParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    let query = BookQuery::build(params)?;
    let books = BookService::list_books(&state.db, None, &query).await?;
    Ok(Json(books))
}

/// Get a single book
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::get_book_by_id(&state.db, id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation error or unknown author", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn create_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = BookService::create_book(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book. Omitted fields keep their current values
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookDto,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Validation error or unknown author", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn update_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateBookDto>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::update_book(&state.db, id, dto).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn delete_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    BookService::delete_book(&state.db, id).await?;
    Ok(Json(json!({"message": "Book deleted successfully"})))
}

/// Import books from an uploaded JSON or CSV file
///
/// Rows that fail to parse or validate are logged and skipped; the
/// response lists only the books that were created.
#[utoipa::path(
    post,
    path = "/api/books/import",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Books created from the file", body = Vec<Book>),
        (status = 400, description = "Missing file or unparseable content", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user, multipart))]
pub async fn import_books(
    State(state): State<AppState>,
    _user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<Vec<Book>>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("No file uploaded")))?;

    let filename = field
        .file_name()
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Uploaded file has no name")))?
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read file: {e}")))?;

    let rows = transfer::parse_import(&filename, &bytes)?;

    let mut created = Vec::with_capacity(rows.len());
    for row in rows {
        let dto = match row {
            Ok(dto) => dto,
            Err(e) => {
                warn!(error = %e, "skipping unparseable import row");
                continue;
            }
        };

        let title = dto.title.clone();
        match BookService::create_book(&state.db, dto).await {
            Ok(book) => created.push(book),
            Err(e) => warn!(title = %title, error = %e.error, "skipping import row"),
        }
    }

    Ok(Json(created))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExportParams {
    pub export_file_ext: Option<String>,
}

/// Export the full catalog as a JSON or CSV attachment
#[utoipa::path(
    get,
    path = "/api/books/export",
    params(ExportParams),
    responses(
        (status = 200, description = "Catalog file download"),
        (status = 400, description = "Unsupported export format", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn export_books(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let ext = params.export_file_ext.as_deref().unwrap_or("json");

    let query = BookQuery {
        limit: i64::MAX,
        ..BookQuery::default()
    };
    let books = BookService::list_books(&state.db, None, &query).await?;

    let (content_type, body) = match ext {
        "json" => (
            "application/json",
            serde_json::to_string_pretty(&books)
                .map_err(|e| AppError::internal(anyhow::anyhow!(e)))?,
        ),
        "csv" => ("text/csv", transfer::to_csv(&books)),
        other => {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Unsupported export format '{}'. Allowed values: json, csv",
                other
            )));
        }
    };

    let response = (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"books_export.{ext}\""),
            ),
        ],
        body,
    )
        .into_response();

    Ok(response)
}
