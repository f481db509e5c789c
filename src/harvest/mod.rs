//! The harvest pipeline: catalog, details, text URLs, downloads, metadata.
//!
//! A run is strictly sequential. Each request is awaited before the next is
//! issued, and the metadata table is written once, after the last item.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::HttpClient;
//! use harvester_core::harvest::{HarvestConfig, Harvester};
//! use harvester_core::resolver::TextUrlResolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let harvester = Harvester::new(HarvestConfig::default(), TextUrlResolver::default());
//! let summary = harvester.run(&client).await?;
//! println!("{} new books", summary.new_records);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;

pub use config::{
    DEFAULT_CATALOG_URL, DEFAULT_OUTPUT_DIR, DEFAULT_WINDOW_SKIP, DEFAULT_WINDOW_TAKE,
    HarvestConfig, Window,
};
pub use error::{HarvestError, ItemError};

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::download::{Fetch, book_filename, save_text};
use crate::parser::{extract_ebook_id, extract_list_links, extract_metadata};
use crate::resolver::TextUrlResolver;
use crate::store::{BookRecord, MetadataStore, merge_records};

/// Counts from one harvest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Unique item links found on the catalog page.
    pub discovered: usize,
    /// Links inside the processing window.
    pub windowed: usize,
    /// Records added to the metadata table.
    pub new_records: usize,
    /// Items skipped because their id was already recorded.
    pub skipped_known: usize,
    /// Items dropped (page unavailable, no id, no text URL).
    pub failed: usize,
    /// Resolved texts that could not be saved for otherwise recorded items.
    pub download_failures: usize,
    /// Rows in the metadata table after the run.
    pub total_records: usize,
}

/// Result of processing one catalog link.
#[derive(Debug)]
enum ItemOutcome {
    New(BookRecord),
    Known(String),
}

/// Runs the pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Harvester {
    config: HarvestConfig,
    resolver: TextUrlResolver,
}

impl Harvester {
    /// Creates a harvester.
    #[must_use]
    pub fn new(config: HarvestConfig, resolver: TextUrlResolver) -> Self {
        Self { config, resolver }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Runs one harvest.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::CatalogUnavailable`] or
    /// [`HarvestError::EmptyCatalog`] when there is nothing to process (no
    /// metadata is written in that case), [`HarvestError::OutputDir`] when the
    /// download directory cannot be created, and [`HarvestError::Store`] when
    /// the metadata table cannot be read or written. Failures of individual
    /// items are logged and counted, never returned.
    #[instrument(skip(self, fetcher), fields(catalog = %self.config.catalog_url))]
    pub async fn run(&self, fetcher: &dyn Fetch) -> Result<HarvestSummary, HarvestError> {
        let config = &self.config;

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| HarvestError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        info!("Fetching list of top books");
        let catalog = fetcher.fetch(&config.catalog_url).await.ok_or_else(|| {
            HarvestError::CatalogUnavailable {
                url: config.catalog_url.clone(),
            }
        })?;
        let links = extract_list_links(&catalog.body, &config.catalog_url);
        if links.is_empty() {
            return Err(HarvestError::EmptyCatalog {
                url: config.catalog_url.clone(),
            });
        }

        let store = MetadataStore::new(&config.metadata_path);
        let existing = store.load().await?;
        let mut known: HashSet<String> = existing.iter().map(|r| r.ebook_id.clone()).collect();
        debug!(existing = existing.len(), "loaded existing metadata");

        let unique = dedupe_links(links);
        let window = config.window.apply(&unique);
        let mut summary = HarvestSummary {
            discovered: unique.len(),
            windowed: window.len(),
            ..HarvestSummary::default()
        };
        info!(
            discovered = summary.discovered,
            windowed = summary.windowed,
            skip = config.window.skip,
            take = config.window.take,
            "Processing catalog window"
        );

        let mut new_records = Vec::new();
        for link in window {
            match self.process_item(fetcher, link, &known).await {
                Ok(ItemOutcome::New(record)) => {
                    if record.filename.is_none() && !config.metadata_only && record.text_url.is_some()
                    {
                        summary.download_failures += 1;
                    }
                    let verb = if record.filename.is_some() { "Downloaded" } else { "Recorded" };
                    info!(
                        ebook_id = %record.ebook_id,
                        "{verb}: {} by {}",
                        record.title,
                        record.author
                    );
                    known.insert(record.ebook_id.clone());
                    new_records.push(record);
                }
                Ok(ItemOutcome::Known(ebook_id)) => {
                    debug!(%ebook_id, "already recorded");
                    summary.skipped_known += 1;
                }
                Err(error) => {
                    warn!(url = %link, error = %error, "Error processing item");
                    summary.failed += 1;
                }
            }
        }

        summary.new_records = new_records.len();
        let merged = merge_records(existing, new_records);
        summary.total_records = merged.len();
        if merged.is_empty() {
            info!("No books were recorded; metadata table left untouched");
        } else {
            store.save(&merged).await?;
        }

        info!(
            new = summary.new_records,
            known = summary.skipped_known,
            failed = summary.failed,
            total = summary.total_records,
            "Harvest complete"
        );
        Ok(summary)
    }

    /// Fetches one detail page, extracts and resolves it, and saves the text
    /// served by the winning probe.
    #[instrument(skip(self, fetcher, known))]
    async fn process_item(
        &self,
        fetcher: &dyn Fetch,
        link: &str,
        known: &HashSet<String>,
    ) -> Result<ItemOutcome, ItemError> {
        if let Some(ebook_id) = extract_ebook_id(link).filter(|id| known.contains(id)) {
            return Ok(ItemOutcome::Known(ebook_id));
        }

        let page = fetcher
            .fetch(link)
            .await
            .ok_or_else(|| ItemError::DetailUnavailable {
                url: link.to_string(),
            })?;
        let metadata =
            extract_metadata(&page.body, link).ok_or_else(|| ItemError::MissingEbookId {
                url: link.to_string(),
            })?;

        let resolved = self
            .resolver
            .resolve_text(fetcher, &metadata.ebook_id)
            .await;
        let Some(text) = resolved else {
            if self.config.keep_unresolved {
                return Ok(ItemOutcome::New(BookRecord::from_metadata(metadata, None)));
            }
            return Err(ItemError::Unresolved {
                ebook_id: metadata.ebook_id,
            });
        };

        let mut record = BookRecord::from_metadata(metadata, Some(text.url));
        if !self.config.metadata_only {
            let destination = self
                .config
                .output_dir
                .join(book_filename(&record.title, &record.ebook_id));
            if save_text(&text.body, &destination).await {
                record.filename = Some(destination.display().to_string());
            }
        }
        Ok(ItemOutcome::New(record))
    }
}

/// Drops repeated links, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_links(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
