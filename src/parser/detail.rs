//! Detail page parsing: bibliographic fields plus the item identifier.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::html::compile_static_regex;
use super::strategy::{ExtractionStrategy, default_strategies, extract_fields};

/// Value used for any field no strategy could resolve.
pub const UNKNOWN: &str = "Unknown";

static EBOOK_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"/ebooks/(\d+)"));

/// Metadata read from one detail page, before download-URL resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    /// Numeric identifier from the detail URL.
    pub ebook_id: String,
    /// Title, or [`UNKNOWN`].
    pub title: String,
    /// Cleaned author, or [`UNKNOWN`].
    pub author: String,
    /// Four-digit year, or [`UNKNOWN`].
    pub year: String,
    /// The detail page URL.
    pub gutenberg_url: String,
}

/// Extracts the numeric identifier following `/ebooks/` in a URL.
///
/// ```
/// use harvester_core::parser::extract_ebook_id;
///
/// assert_eq!(extract_ebook_id("https://www.gutenberg.org/ebooks/2701").as_deref(), Some("2701"));
/// assert_eq!(extract_ebook_id("https://www.gutenberg.org/browse/scores/top"), None);
/// ```
#[must_use]
pub fn extract_ebook_id(url: &str) -> Option<String> {
    EBOOK_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

/// Extracts metadata from a detail page using the default strategies.
///
/// Returns `None` when `detail_url` carries no item identifier; an item
/// without one cannot be tracked. Unresolved fields become [`UNKNOWN`].
#[must_use]
pub fn extract_metadata(detail_html: &str, detail_url: &str) -> Option<BookMetadata> {
    extract_metadata_with(detail_html, detail_url, &default_strategies())
}

/// Like [`extract_metadata`], with an explicit strategy list.
#[must_use]
pub fn extract_metadata_with(
    detail_html: &str,
    detail_url: &str,
    strategies: &[Box<dyn ExtractionStrategy>],
) -> Option<BookMetadata> {
    let Some(ebook_id) = extract_ebook_id(detail_url) else {
        debug!(url = detail_url, "detail URL has no ebook id");
        return None;
    };

    let document = Html::parse_document(detail_html);
    let fields = extract_fields(&document, strategies);

    Some(BookMetadata {
        ebook_id,
        title: fields.title.unwrap_or_else(|| UNKNOWN.to_string()),
        author: fields.author.unwrap_or_else(|| UNKNOWN.to_string()),
        year: fields.year.unwrap_or_else(|| UNKNOWN.to_string()),
        gutenberg_url: detail_url.to_string(),
    })
}
