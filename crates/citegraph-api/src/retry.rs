//! A typed retry wrapper standing in for the original's decorator-style
//! `@retry(...)`. Retries an async operation while its error satisfies
//! `is_retryable`, backing off exponentially (base 1s, cap 30s) between
//! attempts. The operation's own error type decides retryability; this
//! wrapper only owns the attempt count and the sleep.

use std::time::Duration;

use citegraph_common::CitegraphError;
use tracing::warn;

const BASE_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub async fn retry_with_backoff<F, Fut, T>(max_attempts: u32, mut op: F) -> Result<T, CitegraphError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CitegraphError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let backoff = exponential_backoff(attempt);
                warn!(attempt, ?backoff, error = %e, "retrying after transient failure");
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn exponential_backoff(attempt: u32) -> Duration {
    let scaled = BASE_BACKOFF.saturating_mul(1u32 << (attempt - 1).min(5));
    scaled.min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_caps_at_30s() {
        assert_eq!(exponential_backoff(1), Duration::from_secs(1));
        assert_eq!(exponential_backoff(2), Duration::from_secs(2));
        assert_eq!(exponential_backoff(6), Duration::from_secs(30));
        assert_eq!(exponential_backoff(20), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff(5, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(CitegraphError::Transient("boom".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn surfaces_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), CitegraphError> = retry_with_backoff(3, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(CitegraphError::Transient("always".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), CitegraphError> = retry_with_backoff(5, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(CitegraphError::Config("bad".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
