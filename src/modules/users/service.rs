use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, RegisterRequestDto, TokenResponse, UserDetail, UserRecord};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_by_email(db: &PgPool, email: &str) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM get_user_by_email($1)")
            .bind(email)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    /// Register a new user. The email is checked for uniqueness before the
    /// insert; the database's unique constraint backs up that check against
    /// concurrent registrations.
    #[instrument(skip(db, dto))]
    pub async fn register(db: &PgPool, dto: RegisterRequestDto) -> Result<UserDetail, AppError> {
        if Self::get_by_email(db, &dto.email).await?.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A user with this email already exists"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM create_user($1, $2, $3)")
            .bind(&dto.email)
            .bind(&hashed_password)
            .bind(&dto.full_name)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A user with this email already exists"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(user.into())
    }

    /// Verify credentials and issue a bearer token. Both an unknown email
    /// and a wrong password come back as 400, without revealing which of
    /// the two it was.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let user = Self::get_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!("User with these credentials not found"))
            })?;

        if !verify_password(&dto.password, &user.hashed_password)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Invalid user credentials"
            )));
        }

        let access_token = create_access_token(&user.email, jwt_config)?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn unique_email() -> String {
        format!("test-{}@test.com", uuid::Uuid::new_v4())
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: email.to_string(),
            password: "strongpassword".to_string(),
            full_name: "Test User".to_string(),
        }
    }

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            token_expiry_minutes: 60,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_success(pool: PgPool) {
        let email = unique_email();

        let user = UserService::register(&pool, register_dto(&email))
            .await
            .unwrap();

        assert_eq!(user.email, email);
        assert_eq!(user.full_name, "Test User");
        assert!(user.id > 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_never_stores_plaintext(pool: PgPool) {
        let email = unique_email();

        UserService::register(&pool, register_dto(&email))
            .await
            .unwrap();

        let stored = UserService::get_by_email(&pool, &email)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.hashed_password, "strongpassword");
        assert!(stored.hashed_password.starts_with("$argon2"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_email(pool: PgPool) {
        let email = unique_email();

        UserService::register(&pool, register_dto(&email))
            .await
            .unwrap();

        let result = UserService::register(&pool, register_dto(&email)).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_success(pool: PgPool) {
        let email = unique_email();
        UserService::register(&pool, register_dto(&email))
            .await
            .unwrap();

        let response = UserService::login(
            &pool,
            LoginRequest {
                email: email.clone(),
                password: "strongpassword".to_string(),
            },
            &test_jwt_config(),
        )
        .await
        .unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.token_type, "bearer");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_wrong_password(pool: PgPool) {
        let email = unique_email();
        UserService::register(&pool, register_dto(&email))
            .await
            .unwrap();

        let result = UserService::login(
            &pool,
            LoginRequest {
                email,
                password: "wrongpassword".to_string(),
            },
            &test_jwt_config(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_unknown_email(pool: PgPool) {
        let result = UserService::login(
            &pool,
            LoginRequest {
                email: unique_email(),
                password: "strongpassword".to_string(),
            },
            &test_jwt_config(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_by_email_not_found(pool: PgPool) {
        let user = UserService::get_by_email(&pool, "nonexistent@test.com")
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
