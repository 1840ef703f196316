use sqlx::PgPool;
use tracing::instrument;

use crate::modules::authors::service::AuthorService;
use crate::utils::errors::AppError;

use super::model::{Book, CreateBookDto, UpdateBookDto, check_published_year, parse_genre};
use super::query::BookQuery;

pub struct BookService;

impl BookService {
    /// List books through the `get_books` routine. The query carries the
    /// full positional parameter list; `id` is only ever set by
    /// [`Self::get_book_by_id`].
    #[instrument(skip(db))]
    pub async fn list_books(
        db: &PgPool,
        book_id: Option<i32>,
        query: &BookQuery,
    ) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM get_books($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(book_id)
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.genre)
        .bind(query.year_from)
        .bind(query.year_to)
        .bind(&query.sort_by)
        .bind(&query.sort_order)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(db)
        .await?;

        Ok(books)
    }

    #[instrument(skip(db))]
    pub async fn get_book_by_id(db: &PgPool, book_id: i32) -> Result<Book, AppError> {
        Self::list_books(db, Some(book_id), &BookQuery::default())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Book not found")))
    }

    /// Create a book. The author must already exist; unknown authors are
    /// rejected here rather than surfacing the routine's exception.
    #[instrument(skip(db))]
    pub async fn create_book(db: &PgPool, dto: CreateBookDto) -> Result<Book, AppError> {
        parse_genre(&dto.genre)?;
        check_published_year(dto.published_year)?;
        Self::ensure_author_exists(db, &dto.author_name).await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM create_book($1, $2, $3, $4, $5)")
            .bind(&dto.title)
            .bind(&dto.isbn)
            .bind(dto.published_year)
            .bind(&dto.genre)
            .bind(&dto.author_name)
            .fetch_one(db)
            .await?;

        Ok(book)
    }

    /// Partial update. Absent fields keep their stored values; the routine
    /// treats NULL parameters as "unchanged".
    #[instrument(skip(db))]
    pub async fn update_book(
        db: &PgPool,
        book_id: i32,
        dto: UpdateBookDto,
    ) -> Result<Book, AppError> {
        Self::get_book_by_id(db, book_id).await?;

        if let Some(genre) = &dto.genre {
            parse_genre(genre)?;
        }
        if let Some(year) = dto.published_year {
            check_published_year(year)?;
        }
        if let Some(author_name) = &dto.author_name {
            Self::ensure_author_exists(db, author_name).await?;
        }

        let book =
            sqlx::query_as::<_, Book>("SELECT * FROM update_book($1, $2, $3, $4, $5, $6)")
                .bind(book_id)
                .bind(&dto.title)
                .bind(&dto.isbn)
                .bind(dto.published_year)
                .bind(&dto.genre)
                .bind(&dto.author_name)
                .fetch_one(db)
                .await?;

        Ok(book)
    }

    #[instrument(skip(db))]
    pub async fn delete_book(db: &PgPool, book_id: i32) -> Result<(), AppError> {
        let deleted = sqlx::query_scalar::<_, i32>("SELECT delete_book($1)")
            .bind(book_id)
            .fetch_one(db)
            .await?;

        if deleted == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Book not found")));
        }

        Ok(())
    }

    async fn ensure_author_exists(db: &PgPool, author_name: &str) -> Result<(), AppError> {
        let authors = AuthorService::get_authors(db, None, Some(author_name)).await?;
        if authors.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Author '{}' does not exist. Create the author first",
                author_name
            )));
        }
        Ok(())
    }
}
