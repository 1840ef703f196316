use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// JWT claims. The subject is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Full user row as returned by the `get_user_by_email` / `create_user`
/// routines. Never serialized to clients; the hashed password stays inside
/// the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
    pub full_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public projection of a user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct UserDetail {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRecord> for UserDetail {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 255, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Full name can't be empty"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 255, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
