use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::errors::AppError;

/// The closed set of catalog genres. Stored as text in the database; the
/// enum exists so every write goes through [`parse_genre`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    History,
}

impl FromStr for Genre {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fiction" => Ok(Genre::Fiction),
            "Non-Fiction" => Ok(Genre::NonFiction),
            "Science" => Ok(Genre::Science),
            "History" => Ok(Genre::History),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::History => "History",
        };
        f.write_str(s)
    }
}

pub const MIN_PUBLISHED_YEAR: i32 = 1800;

/// Genre must be one of the fixed enum values.
pub fn parse_genre(value: &str) -> Result<Genre, AppError> {
    value.parse::<Genre>().map_err(|_| {
        AppError::bad_request(anyhow::anyhow!(
            "Genre must be one of: Fiction, Non-Fiction, Science, History"
        ))
    })
}

/// Published year must fall in [1800, current year], both inclusive.
pub fn check_published_year(year: i32) -> Result<(), AppError> {
    let current_year = chrono::Utc::now().year();
    if year < MIN_PUBLISHED_YEAR || year > current_year {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Published year must be between {} and {}",
            MIN_PUBLISHED_YEAR,
            current_year
        )));
    }
    Ok(())
}

/// Book projection as returned by the book routines: the row joined with
/// its author's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
    pub author_id: i32,
    pub author_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 255, message = "Title can't be empty"))]
    pub title: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
    pub published_year: i32,
    #[validate(length(min = 1, max = 50, message = "Genre can't be empty"))]
    pub genre: String,
    #[validate(length(min = 1, max = 255, message = "Author name can't be empty"))]
    pub author_name: String,
}

/// Partial update; fields left out keep their current value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookDto {
    #[validate(length(min = 1, max = 255, message = "Title can't be empty"))]
    pub title: Option<String>,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Genre can't be empty"))]
    pub genre: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author name can't be empty"))]
    pub author_name: Option<String>,
}
