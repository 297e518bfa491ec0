//! The processed-papers tier: a Bloom filter backed by the
//! authoritative `processed_papers` table. Negatives are trusted outright;
//! positives are advisory and must be confirmed against the database by
//! the caller before being treated as duplicates.

use citegraph_common::{PaperId, Result};
use redis::aio::ConnectionManager;

use crate::bloom::BloomFilter;

const PROCESSED_KEY: &str = "processed_bloom";

pub struct ProcessedOracle {
    filter: BloomFilter,
}

impl ProcessedOracle {
    pub fn new(conn: ConnectionManager, capacity: u64, fp_rate: f64) -> Self {
        Self { filter: BloomFilter::new(conn, PROCESSED_KEY, capacity, fp_rate) }
    }

    pub async fn bootstrap(&mut self) -> Result<()> {
        self.filter.bootstrap().await
    }

    pub async fn reset(&mut self) -> Result<()> {
        self.filter.reset().await
    }

    /// Splits `ids` into (maybe already processed, definitely unprocessed).
    /// The first set still needs an authoritative check; the second can
    /// be treated as new without touching the database.
    pub async fn partition(&mut self, ids: &[PaperId]) -> Result<(Vec<PaperId>, Vec<PaperId>)> {
        let flags = self.filter.mexists(ids).await?;
        let mut maybe_seen = Vec::new();
        let mut definitely_new = Vec::new();
        for (id, present) in ids.iter().zip(flags) {
            if present {
                maybe_seen.push(id.clone());
            } else {
                definitely_new.push(id.clone());
            }
        }
        Ok((maybe_seen, definitely_new))
    }

    /// Unions `ids` into the filter. Called once the authoritative insert
    /// into `processed_papers` has committed.
    pub async fn mark_seen(&mut self, ids: &[PaperId]) -> Result<()> {
        self.filter.madd(ids).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    // ProcessedOracle talks to a live RedisBloom instance; exercised by
    // citegraph-crawler's ignored integration tests rather than here.
}
