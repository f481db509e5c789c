//! HTTP client wrapper for fetching catalog pages and book texts.
//!
//! This module provides the [`Fetch`] seam and its production implementation,
//! [`HttpClient`], which sends the static browser header set, enforces a
//! per-request timeout, and retries failed attempts with a fixed delay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use super::constants::REQUEST_TIMEOUT_SECS;
use super::error::FetchError;
use super::retry::{RetryDecision, RetryPolicy};
use crate::user_agent;

/// A successful (HTTP 200) response, fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code of the final response.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

/// Source of pages for the harvest pipeline.
///
/// Implementations must swallow their own failures: an unavailable resource
/// is `None`, never an error crossing this boundary.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url`, returning the page on HTTP 200 or `None` once all
    /// attempts have failed.
    async fn fetch(&self, url: &str) -> Option<FetchedPage>;
}

/// HTTP client with bounded fixed-delay retry.
///
/// Created once per run and reused for every request, so connections to the
/// catalog host are pooled.
///
/// # Example
///
/// ```no_run
/// use harvester_core::download::{Fetch, HttpClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// if let Some(page) = client.fetch("https://www.gutenberg.org/browse/scores/top").await {
///     println!("{} bytes", page.body.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a client with the default timeout (10s) and retry policy
    /// (3 attempts, 2s apart).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(
            RetryPolicy::default(),
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a client with an explicit retry policy and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the client cannot be built.
    pub fn with_settings(retry_policy: RetryPolicy, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(user_agent::browser_headers())
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self {
            client,
            retry_policy,
        })
    }

    /// Returns the retry policy in use.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Performs exactly one GET attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for a malformed URL, a transport failure, any
    /// status other than 200, or an unreadable body.
    pub async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::body(url, e)
            }
        })?;

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Fetch for HttpClient {
    #[instrument(skip(self), fields(max_attempts = self.retry_policy.max_attempts()))]
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        let mut attempt = 1;
        loop {
            let error = match self.fetch_once(url).await {
                Ok(page) => {
                    debug!(attempt, bytes = page.body.len(), "fetched");
                    return Some(page);
                }
                Err(error) => error,
            };

            match &error {
                FetchError::HttpStatus { status, .. } => {
                    debug!(attempt, status, "non-200 response");
                }
                _ => warn!(attempt, error = %error, "error making request"),
            }

            if !error.is_retryable() {
                return None;
            }

            match self.retry_policy.should_retry(attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(%reason, "giving up");
                    return None;
                }
            }
        }
    }
}
