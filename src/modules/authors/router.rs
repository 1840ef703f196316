use axum::{
    Router,
    routing::get,
};

use crate::state::AppState;

use super::controller::{create_author, delete_author, get_author, list_authors, update_author};

pub fn init_authors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
}
