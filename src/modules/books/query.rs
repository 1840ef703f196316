use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

use crate::utils::errors::AppError;

/// Columns the listing endpoint may sort on. Anything else is rejected
/// before the query is built.
pub const ALLOWED_SORT_FIELDS: [&str; 5] =
    ["title", "published_year", "genre", "isbn", "created_at"];

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Raw query string parameters for `GET /api/books`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQueryParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub year_from: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub year_to: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
}

/// Treats `?limit=` the same as an absent parameter instead of failing
/// deserialization.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Validated listing parameters in the exact positional order of the
/// `get_books` routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub sort_by: String,
    pub sort_order: String,
    pub limit: i64,
    pub offset: i64,
}

impl BookQuery {
    /// Validate raw parameters. Unknown sort fields and orders are a 400;
    /// out-of-range limits and offsets are clamped instead.
    pub fn build(params: BookQueryParams) -> Result<Self, AppError> {
        let sort_by = params.sort_by.unwrap_or_else(|| "title".to_string());
        if !ALLOWED_SORT_FIELDS.contains(&sort_by.as_str()) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Invalid sort field '{}'. Allowed fields: {}",
                sort_by,
                ALLOWED_SORT_FIELDS.join(", ")
            )));
        }

        let sort_order = params.sort_order.unwrap_or_else(|| "asc".to_string());
        if sort_order != "asc" && sort_order != "desc" {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Invalid sort order '{}'. Allowed values: asc, desc",
                sort_order
            )));
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        Ok(Self {
            title: params.title,
            author: params.author,
            genre: params.genre,
            year_from: params.year_from,
            year_to: params.year_to,
            sort_by,
            sort_order,
            limit,
            offset,
        })
    }
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            genre: None,
            year_from: None,
            year_to: None,
            sort_by: "title".to_string(),
            sort_order: "asc".to_string(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
