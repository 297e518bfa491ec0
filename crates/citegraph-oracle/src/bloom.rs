//! A single RedisBloom-backed scalable Bloom filter. Membership tests
//! never false-negative; a positive result only means "probably seen"
//! and callers that need certainty fall back to an authoritative store.

use citegraph_common::{CitegraphError, PaperId, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, instrument};

pub(crate) struct BloomFilter {
    conn: ConnectionManager,
    key: String,
    capacity: u64,
    fp_rate: f64,
}

impl BloomFilter {
    pub(crate) fn new(conn: ConnectionManager, key: impl Into<String>, capacity: u64, fp_rate: f64) -> Self {
        Self { conn, key: key.into(), capacity, fp_rate }
    }

    /// `BF.RESERVE key fp_rate capacity`. Tolerates the filter already
    /// existing from a previous run — only `resume` mode relies on that.
    #[instrument(skip(self))]
    pub(crate) async fn bootstrap(&mut self) -> Result<()> {
        let result: redis::RedisResult<()> = redis::cmd("BF.RESERVE")
            .arg(&self.key)
            .arg(self.fp_rate)
            .arg(self.capacity)
            .query_async(&mut self.conn)
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.to_string().to_lowercase().contains("exists") => {
                debug!(key = %self.key, "bloom filter already exists, reusing");
                Ok(())
            }
            Err(e) => Err(CitegraphError::from(e)),
        }
    }

    /// Drops and re-reserves the filter, for `fresh` mode.
    #[instrument(skip(self))]
    pub(crate) async fn reset(&mut self) -> Result<()> {
        let _: () = self.conn.del(&self.key).await.map_err(CitegraphError::from)?;
        self.bootstrap().await
    }

    /// `BF.MEXISTS key item...`. Returns one bool per input, in order.
    pub(crate) async fn mexists(&mut self, ids: &[PaperId]) -> Result<Vec<bool>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("BF.MEXISTS");
        cmd.arg(&self.key);
        for id in ids {
            cmd.arg(id.as_str());
        }
        let flags: Vec<i64> = cmd.query_async(&mut self.conn).await.map_err(CitegraphError::from)?;
        Ok(flags.into_iter().map(|f| f != 0).collect())
    }

    /// `BF.MADD key item...`. Returns one bool per input indicating
    /// whether that item was newly added (true) or already present.
    pub(crate) async fn madd(&mut self, ids: &[PaperId]) -> Result<Vec<bool>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("BF.MADD");
        cmd.arg(&self.key);
        for id in ids {
            cmd.arg(id.as_str());
        }
        let flags: Vec<i64> = cmd.query_async(&mut self.conn).await.map_err(CitegraphError::from)?;
        Ok(flags.into_iter().map(|f| f != 0).collect())
    }
}
