use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Payload for both create and update; an author only has a name.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthorPayload {
    #[validate(
        length(min = 1, max = 255, message = "Author name can't be empty"),
        custom(function = validate_not_blank)
    )]
    pub name: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Author name can't be empty".into()));
    }
    Ok(())
}
