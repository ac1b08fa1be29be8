//! Book model and related types

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record as stored in the catalog file.
///
/// Only `book_id`, `title` and `available` are relied upon by the checkout
/// lifecycle. The remaining fields may be missing in imported data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: Option<i32>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub ratings_count: Option<u64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub price_usd: Option<Decimal>,
    #[serde(default)]
    pub sales_millions: Option<f64>,
    #[serde(default)]
    pub in_print: Option<bool>,
    /// False while the book has an open checkout record
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Create book request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
}

impl CreateBook {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        }
    }
}

impl From<CreateBook> for Book {
    fn from(request: CreateBook) -> Self {
        Self {
            book_id: Uuid::new_v4().to_string(),
            title: request.title,
            author: request.author,
            genre: None,
            publication_year: None,
            page_count: None,
            ratings_count: None,
            average_rating: None,
            price_usd: None,
            sales_millions: None,
            in_print: None,
            available: true,
        }
    }
}

/// Fields a user may edit, in display order
pub const EDITABLE_FIELDS: &[&str] = &[
    "title",
    "author",
    "genre",
    "publication_year",
    "page_count",
    "ratings_count",
    "average_rating",
    "price_usd",
    "sales_millions",
    "in_print",
];

impl Book {
    /// Set a field from raw user input. Empty input clears optional fields.
    pub fn set_field(&mut self, field: &str, raw: &str) -> AppResult<()> {
        let value = raw.trim();
        match field {
            "book_id" => {
                return Err(AppError::Validation("book_id cannot be changed".to_string()))
            }
            "available" => {
                return Err(AppError::Validation(
                    "availability changes only through checkout and checkin".to_string(),
                ))
            }
            "title" => self.title = required(field, value)?,
            "author" => self.author = required(field, value)?,
            "genre" => self.genre = parse_optional(field, value)?,
            "publication_year" => self.publication_year = parse_optional(field, value)?,
            "page_count" => self.page_count = parse_optional(field, value)?,
            "ratings_count" => self.ratings_count = parse_optional(field, value)?,
            "average_rating" => self.average_rating = parse_optional(field, value)?,
            "price_usd" => self.price_usd = parse_optional(field, value)?,
            "sales_millions" => self.sales_millions = parse_optional(field, value)?,
            "in_print" => {
                self.in_print = if value.is_empty() {
                    None
                } else {
                    Some(parse_bool(value))
                }
            }
            other => {
                return Err(AppError::Validation(format!("Unknown field '{}'", other)))
            }
        }
        Ok(())
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn parse_optional<T: std::str::FromStr>(field: &str, value: &str) -> AppResult<Option<T>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Invalid value for {}: '{}'", field, value)))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.available { "available" } else { "checked out" };
        write!(f, "[{}] '{}' by {} ({})", self.book_id, self.title, self.author, status)
    }
}
