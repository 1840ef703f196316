use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{Author, AuthorPayload};

pub struct AuthorService;

impl AuthorService {
    /// List authors through the `get_authors` routine. Both filters are
    /// optional; the name filter is an exact match, used for uniqueness and
    /// foreign-key checks.
    #[instrument(skip(db))]
    pub async fn get_authors(
        db: &PgPool,
        author_id: Option<i32>,
        author_name: Option<&str>,
    ) -> Result<Vec<Author>, AppError> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM get_authors($1, $2)")
            .bind(author_id)
            .bind(author_name)
            .fetch_all(db)
            .await?;

        Ok(authors)
    }

    #[instrument(skip(db))]
    pub async fn get_author_by_id(db: &PgPool, author_id: i32) -> Result<Author, AppError> {
        Self::get_authors(db, Some(author_id), None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Author not found")))
    }

    /// Create an author. The name is checked for uniqueness first; the
    /// check-then-insert window is closed by the unique constraint, whose
    /// violation maps to the same error.
    #[instrument(skip(db))]
    pub async fn create_author(db: &PgPool, dto: AuthorPayload) -> Result<Author, AppError> {
        let existing = Self::get_authors(db, None, Some(&dto.name)).await?;
        if !existing.is_empty() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Author name must be unique. Provided name already exists"
            )));
        }

        let author = sqlx::query_as::<_, Author>("SELECT * FROM create_author($1)")
            .bind(&dto.name)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "Author name must be unique. Provided name already exists"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(author)
    }

    #[instrument(skip(db))]
    pub async fn update_author(
        db: &PgPool,
        author_id: i32,
        dto: AuthorPayload,
    ) -> Result<Author, AppError> {
        Self::get_author_by_id(db, author_id).await?;

        let author = sqlx::query_as::<_, Author>("SELECT * FROM update_author($1, $2)")
            .bind(author_id)
            .bind(&dto.name)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "Author name must be unique. Provided name already exists"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(author)
    }

    #[instrument(skip(db))]
    pub async fn delete_author(db: &PgPool, author_id: i32) -> Result<(), AppError> {
        let deleted = sqlx::query_scalar::<_, i32>("SELECT delete_author($1)")
            .bind(author_id)
            .fetch_one(db)
            .await?;

        if deleted == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Author not found")));
        }

        Ok(())
    }
}
