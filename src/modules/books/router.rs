use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_book, delete_book, export_books, get_book, import_books, list_books, update_book,
};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/import", post(import_books))
        .route("/export", get(export_books))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
}
