//! citegraph-frontier — the shared FIFO work queue, a Redis list of
//! JSON-encoded [`FrontierEntry`] envelopes.

use citegraph_common::{CitegraphError, FrontierEntry, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::instrument;

const QUEUE_KEY: &str = "paper_queue";

pub struct Frontier {
    conn: ConnectionManager,
}

impl Frontier {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(CitegraphError::from)?;
        let conn = client.get_connection_manager().await.map_err(CitegraphError::from)?;
        Ok(Self { conn })
    }

    /// Appends `entries` to the tail of the queue. Malformed entries
    /// can't happen here — serialization of [`FrontierEntry`] is infallible
    /// for the types we have, so any error surfaces rather than being
    /// swallowed.
    #[instrument(skip(self, entries))]
    pub async fn push_many(&mut self, entries: &[FrontierEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let payloads: Vec<String> = entries
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<_, _>>()
            .map_err(CitegraphError::from)?;
        let _: () = self.conn.rpush(QUEUE_KEY, payloads).await.map_err(CitegraphError::from)?;
        Ok(())
    }

    /// Pops up to `n` entries from the head of the queue, non-blocking.
    /// Returns fewer than `n` (possibly zero) if the queue is shorter.
    /// Entries that fail to deserialize are logged and dropped rather
    /// than failing the whole batch.
    #[instrument(skip(self))]
    pub async fn pop_up_to(&mut self, n: usize) -> Result<Vec<FrontierEntry>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let raw: Vec<String> = self
            .conn
            .lpop(QUEUE_KEY, std::num::NonZeroUsize::new(n))
            .await
            .map_err(CitegraphError::from)?;

        let mut entries = Vec::with_capacity(raw.len());
        for payload in raw {
            match serde_json::from_str::<FrontierEntry>(&payload) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(error = %e, "dropping malformed frontier entry"),
            }
        }
        Ok(entries)
    }

    /// `LLEN paper_queue` — used by the resume-mode guard (empty frontier
    /// on resume is fatal) and the fresh-mode bootstrap.
    pub async fn length(&mut self) -> Result<u64> {
        self.conn.llen(QUEUE_KEY).await.map_err(CitegraphError::from)
    }

    /// Deletes the queue outright, for `fresh` mode.
    pub async fn clear(&mut self) -> Result<()> {
        let _: () = self.conn.del(QUEUE_KEY).await.map_err(CitegraphError::from)?;
        Ok(())
    }
}
