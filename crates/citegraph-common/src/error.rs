use thiserror::Error;

/// Crate-wide error type. Each variant names one of the error kinds from
/// the error-handling design: retryable kinds carry enough context for
/// `is_retryable` to dispatch without string matching.
#[derive(Debug, Error)]
pub enum CitegraphError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("oracle/frontier store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("transient API failure: {0}")]
    Transient(String),

    #[error("rate-limited by API (retry-after honored): {0}")]
    RateLimited(String),

    #[error("non-retryable API status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("dedup oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("database deadlock, retries exhausted: {0}")]
    DeadlockExhausted(String),
}

pub type Result<T> = std::result::Result<T, CitegraphError>;

impl CitegraphError {
    /// True for error kinds the send_request retry wrapper should retry:
    /// transient network failures and server-issued rate-limit directives.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CitegraphError::Transient(_) | CitegraphError::RateLimited(_))
    }
}
