//! Error types for the fetch and download path.
//!
//! These errors never leave the [`HttpClient`](super::HttpClient): each failed
//! attempt is classified, logged, and folded into an absent result. They are
//! public so callers (and tests) can reason about a single attempt.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with anything other than 200 OK.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be read or decoded as text.
    #[error("failed to read body of {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns true when another attempt could plausibly succeed.
    ///
    /// Any non-200 answer counts as a failed attempt and is retried; only a
    /// malformed URL or a broken client is final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidUrl { .. } | Self::ClientBuild { .. })
    }
}

/// Errors writing a downloaded text to disk.
#[derive(Debug, Error)]
#[error("IO error writing to {path}: {source}")]
pub struct WriteError {
    /// The file path where the error occurred.
    pub path: PathBuf,
    /// The underlying IO error.
    #[source]
    pub source: std::io::Error,
}

impl WriteError {
    /// Creates a write error for `path`.
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
