//! Constants for the fetch path (timeouts, retry defaults).

use std::time::Duration;

/// Default per-request timeout (10 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default number of attempts per fetch, including the first.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default fixed delay between failed attempts (2 seconds).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
