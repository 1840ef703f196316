use axum::Json;
use axum::extract::State;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{LoginRequest, RegisterRequestDto, TokenResponse, UserDetail};
use super::service::UserService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "User registered successfully", body = UserDetail),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<Json<UserDetail>, AppError> {
    let user = UserService::register(&state.db, dto).await?;
    Ok(Json(user))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = UserService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Current user behind the bearer token
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = UserDetail),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserDetail> {
    Json(user)
}
