//! citegraph-api — the rate-limited HTTP client and the reference
//! pagination sub-protocol for the scholarly citation API.

pub mod client;
pub mod protocol;
pub mod ratelimit;
pub mod retry;

pub use client::ApiClient;
pub use protocol::{fetch_reference_pages, parse_batch_response, PaperBatchRecord};
pub use ratelimit::RateLimiter;
pub use retry::retry_with_backoff;
