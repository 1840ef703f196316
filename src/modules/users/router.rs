use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{current_user, login_user, register_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/me", get(current_user))
}
