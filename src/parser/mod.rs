//! Page parsing for catalog list pages and book detail pages.
//!
//! # Current Support
//!
//! - Catalog list pages: item links from the first ordered list
//! - Detail pages: title, author and year through named strategies
//!   (bibliographic table first, page header second)
//! - Item identifiers parsed from `/ebooks/<digits>` URLs
//!
//! # Example
//!
//! ```
//! use harvester_core::parser::extract_metadata;
//!
//! let html = r#"<h1 class="header">Walden by Henry Thoreau</h1>"#;
//! let meta = extract_metadata(html, "https://www.gutenberg.org/ebooks/205").unwrap();
//! assert_eq!(meta.title, "Walden");
//! assert_eq!(meta.author, "Henry Thoreau");
//! ```

mod catalog;
mod detail;
mod html;
mod strategy;

pub use catalog::{EXCLUDED_SUFFIXES, ITEM_PATH_PREFIX, extract_list_links};
pub use detail::{
    BookMetadata, UNKNOWN, extract_ebook_id, extract_metadata, extract_metadata_with,
};
pub use strategy::{
    BibrecTableStrategy, ExtractionStrategy, HeaderTitleStrategy, PartialFields, clean_author,
    default_strategies, extract_fields,
};
