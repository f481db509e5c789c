//! Gutenberg Harvester Core Library
//!
//! This library collects bibliographic metadata and plain-text files for the
//! most popular books in the Project Gutenberg catalog, and keeps a local
//! metadata table that grows across runs without duplicates.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - HTTP fetch client with retry, and text downloads
//! - [`parser`] - Catalog list and detail page extraction
//! - [`resolver`] - Candidate text-URL probing
//! - [`store`] - CSV metadata table persistence and merging
//! - [`harvest`] - The sequential pipeline tying the above together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod harvest;
pub mod parser;
pub mod resolver;
pub mod store;
mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, Fetch, FetchError, FetchedPage, HttpClient,
    REQUEST_TIMEOUT_SECS, RetryPolicy,
};
pub use harvest::{HarvestConfig, HarvestError, HarvestSummary, Harvester, Window};
pub use parser::{BookMetadata, extract_list_links, extract_metadata};
pub use resolver::{DEFAULT_MIRROR_URL, TextUrlResolver};
pub use store::{BookRecord, MetadataStore, StoreError};
pub use user_agent::BROWSER_USER_AGENT;
