//! Static browser-like request headers for catalog traffic.
//!
//! The same header set is sent on every request and every retry; the catalog
//! serves plain HTML to ordinary desktop browsers and nothing here rotates.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};

/// Desktop browser User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Builds the default header set attached to the HTTP client.
#[must_use]
pub(crate) fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}
