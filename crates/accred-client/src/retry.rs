//! Retry with exponential backoff for idempotent store reads.
//!
//! Only transport failures (connection refused, timeouts) are retried.
//! Status codes are the caller's concern. Writes never go through here.

use std::time::Duration;

/// Retries after the first attempt.
const MAX_RETRIES: u32 = 2;

/// First backoff delay; doubles on every retry (200ms, 400ms).
const BASE_DELAY_MS: u64 = 200;

/// Send a read request, retrying transport failures with backoff.
pub(crate) async fn retry_read<F, Fut>(endpoint: &str, f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "store read failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
