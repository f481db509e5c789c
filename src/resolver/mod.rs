//! Download-URL resolution for book texts.
//!
//! Gutenberg serves plain text at one of several well-known paths depending
//! on when the item was produced. [`TextUrlResolver`] probes those paths in a
//! fixed order and keeps the first that answers.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::HttpClient;
//! use harvester_core::resolver::TextUrlResolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let resolver = TextUrlResolver::default();
//! if let Some(url) = resolver.resolve_text_url(&client, "2701").await {
//!     println!("Text at: {url}");
//! }
//! # Ok(())
//! # }
//! ```

mod candidates;

pub use candidates::{CandidateTemplate, DEFAULT_CANDIDATES};

use tracing::{debug, instrument};

use crate::download::Fetch;

/// Default mirror serving the text files.
pub const DEFAULT_MIRROR_URL: &str = "https://www.gutenberg.org";

/// The candidate that answered, with the body it served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedText {
    /// Candidate URL that succeeded.
    pub url: String,
    /// Text served at `url`.
    pub body: String,
}

/// Probes candidate text URLs for an item, strictly in order.
#[derive(Debug, Clone)]
pub struct TextUrlResolver {
    base_url: String,
    candidates: Vec<CandidateTemplate>,
}

impl Default for TextUrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_URL)
    }
}

impl TextUrlResolver {
    /// Creates a resolver over `base_url` with the default candidate order.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_candidates(base_url, DEFAULT_CANDIDATES.to_vec())
    }

    /// Creates a resolver with an explicit candidate list.
    #[must_use]
    pub fn with_candidates(base_url: impl Into<String>, candidates: Vec<CandidateTemplate>) -> Self {
        Self {
            base_url: base_url.into(),
            candidates,
        }
    }

    /// Returns the mirror base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Candidate URLs for `ebook_id`, in probe order.
    #[must_use]
    pub fn candidate_urls(&self, ebook_id: &str) -> Vec<String> {
        self.candidates
            .iter()
            .map(|template| template.url(&self.base_url, ebook_id))
            .collect()
    }

    /// Returns the first candidate URL that `fetcher` can retrieve.
    ///
    /// Each probe is a full GET through the fetcher (with its retries).
    /// Returns `None` once every candidate has failed.
    pub async fn resolve_text_url(&self, fetcher: &dyn Fetch, ebook_id: &str) -> Option<String> {
        self.resolve_text(fetcher, ebook_id).await.map(|text| text.url)
    }

    /// Like [`resolve_text_url`](Self::resolve_text_url), keeping the body
    /// of the winning probe so it need not be fetched again.
    #[instrument(skip(self, fetcher), fields(base_url = %self.base_url))]
    pub async fn resolve_text(&self, fetcher: &dyn Fetch, ebook_id: &str) -> Option<ResolvedText> {
        for url in self.candidate_urls(ebook_id) {
            if let Some(page) = fetcher.fetch(&url).await {
                debug!(url = %url, bytes = page.body.len(), "text URL resolved");
                return Some(ResolvedText {
                    url,
                    body: page.body,
                });
            }
            debug!(url = %url, "candidate unavailable");
        }
        debug!("no candidate text URL responded");
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::download::FetchedPage;

    /// Serves only `available` URLs and records every probe.
    struct RecordingFetcher {
        available: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingFetcher {
        fn new(available: &[&str]) -> Self {
            Self {
                available: available.iter().map(|s| (*s).to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Option<FetchedPage> {
            self.calls.lock().unwrap().push(url.to_string());
            self.available.contains(url).then(|| FetchedPage {
                url: url.to_string(),
                status: 200,
                body: "text".to_string(),
            })
        }
    }

    const BASE: &str = "https://mirror.test";

    #[tokio::test]
    async fn test_resolve_first_candidate_stops_immediately() {
        let fetcher = RecordingFetcher::new(&["https://mirror.test/files/84/84-0.txt"]);
        let resolver = TextUrlResolver::new(BASE);

        let url = resolver.resolve_text_url(&fetcher, "84").await;
        assert_eq!(url.as_deref(), Some("https://mirror.test/files/84/84-0.txt"));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_falls_through_in_order() {
        let fetcher = RecordingFetcher::new(&["https://mirror.test/cache/epub/84/pg84.txt"]);
        let resolver = TextUrlResolver::new(BASE);

        let url = resolver.resolve_text_url(&fetcher, "84").await;
        assert_eq!(url.as_deref(), Some("https://mirror.test/cache/epub/84/pg84.txt"));
        assert_eq!(
            fetcher.calls(),
            vec![
                "https://mirror.test/files/84/84-0.txt",
                "https://mirror.test/files/84/84.txt",
                "https://mirror.test/cache/epub/84/pg84.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_skips_later_candidates_after_success() {
        let fetcher = RecordingFetcher::new(&[
            "https://mirror.test/files/84/84.txt",
            "https://mirror.test/cache/epub/84/pg84.txt",
        ]);
        let resolver = TextUrlResolver::new(BASE);

        let url = resolver.resolve_text_url(&fetcher, "84").await;
        assert_eq!(url.as_deref(), Some("https://mirror.test/files/84/84.txt"));
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_text_keeps_candidate_url_and_body() {
        let fetcher = RecordingFetcher::new(&["https://mirror.test/files/84/84.txt"]);
        let resolver = TextUrlResolver::new(BASE);

        let text = resolver.resolve_text(&fetcher, "84").await.unwrap();
        assert_eq!(text.url, "https://mirror.test/files/84/84.txt");
        assert_eq!(text.body, "text");
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_all_fail_returns_none_after_three_probes() {
        let fetcher = RecordingFetcher::new(&[]);
        let resolver = TextUrlResolver::new(BASE);

        assert!(resolver.resolve_text_url(&fetcher, "84").await.is_none());
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[test]
    fn test_default_resolver_uses_gutenberg_mirror() {
        let resolver = TextUrlResolver::default();
        assert_eq!(resolver.base_url(), DEFAULT_MIRROR_URL);
        assert_eq!(resolver.candidate_urls("1").len(), 3);
    }
}
