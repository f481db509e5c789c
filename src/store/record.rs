//! The persisted book record.

use serde::{Deserialize, Serialize};

use crate::parser::BookMetadata;

/// Column order of the metadata table.
pub const COLUMNS: [&str; 7] = [
    "title",
    "author",
    "year",
    "filename",
    "gutenberg_url",
    "text_url",
    "ebook_id",
];

/// One row of the metadata table, keyed by `ebook_id`.
///
/// Field order matches [`COLUMNS`]; the CSV codec relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Title, or `"Unknown"`.
    pub title: String,
    /// Author, or `"Unknown"`.
    pub author: String,
    /// Year, or `"Unknown"`.
    pub year: String,
    /// Path of the downloaded text, when one was written.
    #[serde(default)]
    pub filename: Option<String>,
    /// Detail page URL.
    pub gutenberg_url: String,
    /// Resolved plain-text URL, when resolution succeeded.
    #[serde(default)]
    pub text_url: Option<String>,
    /// Stable item identifier.
    pub ebook_id: String,
}

impl BookRecord {
    /// Builds a record from extracted metadata and an optional resolved URL.
    #[must_use]
    pub fn from_metadata(metadata: BookMetadata, text_url: Option<String>) -> Self {
        Self {
            title: metadata.title,
            author: metadata.author,
            year: metadata.year,
            filename: None,
            gutenberg_url: metadata.gutenberg_url,
            text_url,
            ebook_id: metadata.ebook_id,
        }
    }
}
