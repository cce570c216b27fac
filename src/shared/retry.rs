use crate::shared::config::RetryConfig;
use crate::shared::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retry an idempotent read a bounded number of times on transient store
/// failures. Validation and domain errors pass through untouched, and write
/// operations must not go through here (re-check state instead, so an
/// apparent-but-not-actual failure cannot double-apply).
pub async fn retry_read<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                debug!(attempt, "transient store failure, retrying read: {err}");
                tokio::time::sleep(Duration::from_millis(config.backoff_ms)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
