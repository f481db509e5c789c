//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use harvester_core::harvest::{
    DEFAULT_CATALOG_URL, DEFAULT_OUTPUT_DIR, DEFAULT_WINDOW_SKIP, DEFAULT_WINDOW_TAKE,
    HarvestConfig, Window,
};
use harvester_core::store::DEFAULT_METADATA_PATH;
use harvester_core::{DEFAULT_MAX_RETRIES, DEFAULT_MIRROR_URL, REQUEST_TIMEOUT_SECS, RetryPolicy};

/// Harvest metadata and texts for the most popular Project Gutenberg books.
///
/// Each run reads the top-books list, takes a window of it, records title,
/// author and year for every book not seen before, and saves its plain text.
#[derive(Parser, Debug)]
#[command(name = "gutenberg-harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Catalog page listing the top books
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Mirror base URL used to locate text files
    #[arg(long, default_value = DEFAULT_MIRROR_URL)]
    pub mirror_url: String,

    /// Directory receiving downloaded texts
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Metadata table (CSV)
    #[arg(short = 'm', long, default_value = DEFAULT_METADATA_PATH)]
    pub metadata: PathBuf,

    /// Unique catalog links skipped before processing starts
    #[arg(long, default_value_t = DEFAULT_WINDOW_SKIP)]
    pub skip: usize,

    /// Unique catalog links processed this run (1-1000)
    #[arg(long, default_value_t = DEFAULT_WINDOW_TAKE as u16, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub take: u16,

    /// Attempts per request, including the first (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,

    /// Delay between attempts in milliseconds (0-60000)
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds (1-300)
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Record metadata without downloading texts
    #[arg(long)]
    pub metadata_only: bool,

    /// Keep books whose text could not be located (with an empty text_url)
    #[arg(long)]
    pub keep_unresolved: bool,
}

impl Args {
    /// Retry policy for the fetch client.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            u32::from(self.max_retries),
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    /// Per-request timeout for the fetch client.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pipeline configuration.
    pub fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig {
            catalog_url: self.catalog_url.clone(),
            output_dir: self.output_dir.clone(),
            metadata_path: self.metadata.clone(),
            window: Window::new(self.skip, usize::from(self.take)),
            metadata_only: self.metadata_only,
            keep_unresolved: self.keep_unresolved,
        }
    }
}
