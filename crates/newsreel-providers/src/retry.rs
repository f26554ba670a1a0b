//! Retry helper shared by the HTTP clients.

use std::time::Duration;

use tracing::warn;

use crate::error::{ProviderError, ProviderResult};

/// Run `operation` up to `max_retries + 1` times, backing off
/// exponentially (500ms, 1s, 2s, ...) between retryable failures.
pub(crate) async fn with_retry<F, Fut, T>(max_retries: u32, operation: F) -> ProviderResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = ProviderResult<T>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                warn!(
                    "Provider request failed (attempt {}), retrying in {:?}: {}",
                    attempt + 1,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error
        .unwrap_or_else(|| ProviderError::InvalidResponse("retry loop exhausted".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_retryable_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result: ProviderResult<u32> = with_retry(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ProviderError::ServiceUnavailable("down".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: ProviderResult<u32> = with_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::NotFound) }
        })
        .await;
        assert!(matches!(result, Err(ProviderError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
