//! Deadlock/serialization-failure retry for transactional writes.
//! Distinct from the HTTP client's retry policy: three retries at
//! 1s/2s/4s, gated on Postgres's own error codes rather than a generic
//! retryable predicate.

use std::time::Duration;

use citegraph_common::{CitegraphError, Result};
use tracing::warn;

const BACKOFFS: [Duration; 3] = [Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)];

fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(db_err.code().as_deref(), Some("40P01") | Some("40001")),
        _ => false,
    }
}

/// Retries `op` up to `BACKOFFS.len()` additional times after an initial
/// attempt, sleeping 1s/2s/4s between tries, only for deadlock
/// (`40P01`) and serialization-failure (`40001`) errors.
pub async fn with_deadlock_retry<F, Fut, T>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, sqlx::Error>>,
{
    let mut last_err = None;
    for backoff in std::iter::once(None).chain(BACKOFFS.into_iter().map(Some)) {
        if let Some(delay) = backoff {
            tokio::time::sleep(delay).await;
        }
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if is_retryable(&e) => {
                warn!(error = %e, "deadlock/serialization failure, retrying");
                last_err = Some(e);
            }
            Err(e) => return Err(CitegraphError::from(e)),
        }
    }
    Err(CitegraphError::DeadlockExhausted(
        last_err.map(|e| e.to_string()).unwrap_or_default(),
    ))
}
