//! Run configuration for the harvest pipeline.

use std::path::PathBuf;

use crate::store::DEFAULT_METADATA_PATH;

/// Catalog page listing the most popular books.
pub const DEFAULT_CATALOG_URL: &str = "https://www.gutenberg.org/browse/scores/top";

/// Directory receiving downloaded texts.
pub const DEFAULT_OUTPUT_DIR: &str = "books";

/// Unique catalog links skipped before the window starts.
pub const DEFAULT_WINDOW_SKIP: usize = 25;

/// Unique catalog links processed per run.
pub const DEFAULT_WINDOW_TAKE: usize = 30;

/// Skip/take slice applied to the deduplicated catalog links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Links skipped from the front.
    pub skip: usize,
    /// Links taken after the skipped ones.
    pub take: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            skip: DEFAULT_WINDOW_SKIP,
            take: DEFAULT_WINDOW_TAKE,
        }
    }
}

impl Window {
    /// Creates a window.
    #[must_use]
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    /// Returns the slice of `items` inside the window; empty when `skip`
    /// reaches past the end.
    #[must_use]
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.skip.min(items.len());
        let end = start.saturating_add(self.take).min(items.len());
        &items[start..end]
    }
}

/// Everything a harvest run needs besides the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Catalog list page URL.
    pub catalog_url: String,
    /// Directory for downloaded texts; created if absent.
    pub output_dir: PathBuf,
    /// Metadata table path.
    pub metadata_path: PathBuf,
    /// Slice of the catalog processed this run.
    pub window: Window,
    /// Record metadata without downloading texts.
    pub metadata_only: bool,
    /// Keep items whose text URL could not be resolved (with no `text_url`)
    /// instead of dropping them.
    pub keep_unresolved: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            window: Window::default(),
            metadata_only: false,
            keep_unresolved: false,
        }
    }
}
