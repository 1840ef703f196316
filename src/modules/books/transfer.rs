//! File import and export for the book catalog.
//!
//! Import accepts a JSON array of book payloads or a CSV with a header row.
//! File-level problems (unsupported extension, unreadable content, bad
//! header) are errors; a row that cannot be parsed comes back as a row
//! failure so the rest of the batch still loads. Fields containing commas
//! or quotes are quoted RFC 4180 style on export and unquoted on import.

use anyhow::anyhow;

use crate::utils::errors::AppError;

use super::model::{Book, CreateBookDto};

pub const IMPORT_CSV_HEADER: [&str; 5] =
    ["title", "isbn", "published_year", "genre", "author_name"];

/// One entry per input row: the parsed payload or the reason the row was
/// rejected.
pub type ImportRows = Vec<Result<CreateBookDto, anyhow::Error>>;

/// Parse an uploaded file into book payloads based on its extension.
pub fn parse_import(filename: &str, bytes: &[u8]) -> Result<ImportRows, AppError> {
    let lowered = filename.to_lowercase();
    if lowered.ends_with(".json") {
        parse_json(bytes)
    } else if lowered.ends_with(".csv") {
        parse_csv(bytes)
    } else {
        Err(AppError::bad_request(anyhow!(
            "Unsupported file type. Upload a .json or .csv file"
        )))
    }
}

/// The file must be a JSON array; elements that do not deserialize into a
/// book payload become row failures.
fn parse_json(bytes: &[u8]) -> Result<ImportRows, AppError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|e| AppError::bad_request(anyhow!("Invalid JSON file: {e}")))?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<CreateBookDto>(value)
                .map_err(|e| anyhow!("element {index}: {e}"))
        })
        .collect())
}

/// Header-indexed CSV parse. Column order is free as long as the header
/// names the five expected columns; a missing column is a file-level error,
/// a bad row is a row failure.
fn parse_csv(bytes: &[u8]) -> Result<ImportRows, AppError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AppError::bad_request(anyhow!("CSV file is not valid UTF-8")))?;

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| AppError::bad_request(anyhow!("CSV file is empty")))?;

    let columns = split_csv_line(header);
    let mut indices = [0usize; 5];
    for (slot, name) in indices.iter_mut().zip(IMPORT_CSV_HEADER) {
        *slot = columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| {
                AppError::bad_request(anyhow!("CSV header is missing the '{name}' column"))
            })?;
    }

    Ok(lines
        .enumerate()
        .map(|(line_no, line)| parse_csv_row(line, line_no + 2, indices))
        .collect())
}

fn parse_csv_row(
    line: &str,
    line_no: usize,
    [title_idx, isbn_idx, year_idx, genre_idx, author_idx]: [usize; 5],
) -> Result<CreateBookDto, anyhow::Error> {
    let fields = split_csv_line(line);
    let field = |idx: usize| -> Result<&str, anyhow::Error> {
        fields
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("row {line_no} has too few columns"))
    };

    let published_year = field(year_idx)?
        .parse::<i32>()
        .map_err(|_| anyhow!("row {line_no}: published_year is not a number"))?;

    Ok(CreateBookDto {
        title: field(title_idx)?.to_string(),
        isbn: field(isbn_idx)?.to_string(),
        published_year,
        genre: field(genre_idx)?.to_string(),
        author_name: field(author_idx)?.to_string(),
    })
}

/// Split one CSV line, honoring double-quoted fields with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render books as CSV with the full row shape, ids included.
pub fn to_csv(books: &[Book]) -> String {
    let mut out = String::from("id,title,isbn,published_year,genre,author_id,author_name\n");
    for book in books {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            book.id,
            csv_field(&book.title),
            csv_field(&book.isbn),
            book.published_year,
            csv_field(&book.genre),
            book.author_id,
            csv_field(&book.author_name)
        ));
    }
    out
}
