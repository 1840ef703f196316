//! Authentication extractors.
//!
//! [`AuthUser`] validates the bearer token and exposes the claims without
//! touching the database. [`CurrentUser`] additionally re-looks-up the user
//! behind the token, so a token for a deleted account is rejected with 401
//! even though its signature is still valid.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::users::model::{Claims, UserDetail};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the JWT and provides the claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The subject the token was issued for (the user's email).
    pub fn email(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor for the full user record behind the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserDetail);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        let user = UserService::get_by_email(&state.db, auth_user.email())
            .await?
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("User not found")))?;

        Ok(CurrentUser(user.into()))
    }
}
