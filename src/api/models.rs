//! Wire types for the catalog backend.
//!
//! Field names follow the backend's JSON (`_id`, `publication_year`); the
//! camelCase spellings are accepted on input as aliases.

use serde::{Deserialize, Serialize};

/// A book as held by the client. Identity is `id`; everything else is
/// mutable and owned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(
        default,
        rename = "publication_year",
        alias = "publicationYear",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_year: Option<i32>,
}

/// Body for `POST /books` and `PUT /books/:id`.
///
/// `publication_year` is a raw JSON value: a number when the user typed one,
/// the typed text otherwise, so the backend gets to reject it with its own
/// message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<serde_json::Value>,
}

impl BookInput {
    pub fn new(title: &str, author: &str, year_text: &str) -> Self {
        let year = year_text.trim();
        let publication_year = if year.is_empty() {
            None
        } else {
            Some(match year.parse::<i32>() {
                Ok(n) => serde_json::Value::from(n),
                Err(_) => serde_json::Value::String(year.to_string()),
            })
        };
        Self {
            title: title.to_string(),
            author: author.to_string(),
            publication_year,
        }
    }
}

/// One page of results from `GET /books`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookPage {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "author")]
    Author,
    #[serde(rename = "publication_year")]
    PublicationYear,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Author => "Author",
            SortField::PublicationYear => "Year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortField::Title => SortField::Author,
            SortField::Author => SortField::PublicationYear,
            SortField::PublicationYear => SortField::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Query string for `GET /books`. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Successful `POST /auth/login` or `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Error body; every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
