//! The queued tier: a pure, unbacked Bloom filter guarding against
//! pushing the same id onto the frontier twice. Advisory only — a false
//! positive here just means a paper gets crawled slightly later than it
//! otherwise would, via the processed tier's own check.

use citegraph_common::{PaperId, Result};
use redis::aio::ConnectionManager;

use crate::bloom::BloomFilter;

const QUEUED_KEY: &str = "queued_bloom";

pub struct QueuedOracle {
    filter: BloomFilter,
}

impl QueuedOracle {
    pub fn new(conn: ConnectionManager, capacity: u64, fp_rate: f64) -> Self {
        Self { filter: BloomFilter::new(conn, QUEUED_KEY, capacity, fp_rate) }
    }

    pub async fn bootstrap(&mut self) -> Result<()> {
        self.filter.bootstrap().await
    }

    pub async fn reset(&mut self) -> Result<()> {
        self.filter.reset().await
    }

    /// Atomically tests and marks `ids`, returning the subset that was
    /// newly added — i.e. not already advisory-queued. `BF.MADD`'s
    /// per-item result flag is exactly this oracle's `test_and_add`.
    pub async fn test_and_add(&mut self, ids: &[PaperId]) -> Result<Vec<PaperId>> {
        let flags = self.filter.madd(ids).await?;
        Ok(ids
            .iter()
            .zip(flags)
            .filter_map(|(id, newly_added)| newly_added.then(|| id.clone()))
            .collect())
    }
}
