//! citegraph-oracle — the two-tier deduplication oracle: a
//! RedisBloom-backed probabilistic membership service shared by every
//! crawler worker.

mod bloom;
mod processed;
mod queued;

pub use processed::ProcessedOracle;
pub use queued::QueuedOracle;

use citegraph_common::{CitegraphError, Result};
use redis::aio::ConnectionManager;

/// Opens a `ConnectionManager` against `redis_url`, shared by both tiers.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager> {
    let client = redis::Client::open(redis_url).map_err(CitegraphError::from)?;
    client.get_connection_manager().await.map_err(CitegraphError::from)
}
