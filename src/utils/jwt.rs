use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::Claims;
use crate::utils::errors::AppError;

/// Issue a signed access token for the given email.
///
/// The subject is the user's email; expiry is now plus the configured TTL.
/// Tokens are stateless, validity is a function of signature and expiry only.
pub fn create_access_token(email: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.token_expiry_minutes * 60;

    let claims = Claims {
        sub: email.to_string(),
        exp: exp as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Decode and verify a token, returning its claims.
///
/// An expired signature is reported separately from every other decode
/// failure; both map to 401.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized(anyhow::anyhow!("Token expired")),
        _ => AppError::unauthorized(anyhow::anyhow!("Invalid token")),
    })
}
