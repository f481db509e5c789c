//! HTTP fetching and text downloads.
//!
//! This module provides the fetch client used for every request in the
//! pipeline and the helpers that turn a resolved text URL into a file.
//!
//! # Features
//!
//! - Static browser-like header set on every request
//! - Per-request timeout (10s by default)
//! - Bounded retry with a fixed delay (3 attempts, 2s apart by default)
//! - Failures are logged and folded into `None`, never raised
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{HttpClient, download_text};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let saved = download_text(
//!     &client,
//!     "https://www.gutenberg.org/cache/epub/84/pg84.txt",
//!     Path::new("books/Frankenstein_84.txt"),
//! )
//! .await;
//! println!("saved: {saved}");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod retry;
mod text;

pub use client::{Fetch, FetchedPage, HttpClient};
pub use constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, REQUEST_TIMEOUT_SECS};
pub use error::{FetchError, WriteError};
pub use filename::{book_filename, clean_filename};
pub use retry::{RetryDecision, RetryPolicy};
pub use text::{download_text, save_text};
