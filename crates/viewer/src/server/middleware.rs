//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.

use std::time::Duration;

/// Time allowed for key derivation and decryption on top of the store fetch.
const DECRYPT_HEADROOM: Duration = Duration::from_secs(5);

/// Per-request timeout for a store fetched with `fetch_timeout`.
///
/// A request must never be cut off before the store fetch itself has had a
/// chance to time out, otherwise the caller would see a bare 408 instead of
/// the generic display.
pub fn request_timeout(fetch_timeout: Duration) -> Duration {
    fetch_timeout + DECRYPT_HEADROOM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_outlives_fetch() {
        let fetch = Duration::from_secs(10);
        assert!(request_timeout(fetch) > fetch);
        assert_eq!(request_timeout(fetch), Duration::from_secs(15));
    }
}
