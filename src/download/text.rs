//! Writing fetched book texts to disk.

use std::path::Path;

use tracing::{info, instrument, warn};

use super::client::Fetch;
use super::error::WriteError;

/// Fetches `url` and writes the body to `destination`, overwriting any
/// existing file.
///
/// Returns `false` without touching the filesystem when the fetch fails, and
/// `false` (after logging) when the write fails. Never aborts the caller.
#[instrument(skip(fetcher), fields(destination = %destination.display()))]
pub async fn download_text(fetcher: &dyn Fetch, url: &str, destination: &Path) -> bool {
    let Some(page) = fetcher.fetch(url).await else {
        warn!("text unavailable");
        return false;
    };

    save_text(&page.body, destination).await
}

/// Writes an already fetched text to `destination`, overwriting any existing
/// file. Returns `false` (after logging) when the write fails.
#[instrument(skip(body), fields(destination = %destination.display(), bytes = body.len()))]
pub async fn save_text(body: &str, destination: &Path) -> bool {
    match write_text(destination, body).await {
        Ok(()) => {
            info!("text saved");
            true
        }
        Err(error) => {
            warn!(error = %error, "error downloading text");
            false
        }
    }
}

async fn write_text(destination: &Path, body: &str) -> Result<(), WriteError> {
    tokio::fs::write(destination, body)
        .await
        .map_err(|e| WriteError::new(destination, e))
}
