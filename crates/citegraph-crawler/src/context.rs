//! Wires the collaborator crates into a single handle the crawl loop
//! and lifecycle controller share.

use std::time::Duration;

use citegraph_api::ApiClient;
use citegraph_common::{CitegraphError, Config, Result};
use citegraph_db::Repository;
use citegraph_frontier::Frontier;
use citegraph_oracle::{ProcessedOracle, QueuedOracle};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;

pub struct Context {
    pub config: Config,
    pub repo: Repository,
    pub frontier: Frontier,
    pub processed: ProcessedOracle,
    pub queued: QueuedOracle,
    pub api: ApiClient,
    pub cancel: CancellationToken,
}

impl Context {
    pub async fn build(config: Config, cancel: CancellationToken) -> Result<Self> {
        let pool =
            citegraph_db::connect(&config.database.url, config.database.max_connections, config.database.min_connections)
                .await?;
        let repo = Repository::new(pool);

        let frontier = Frontier::connect(&config.redis.url).await?;

        let processed_conn = citegraph_oracle::connect(&config.redis.url).await?;
        let mut processed = ProcessedOracle::new(processed_conn, config.oracle.processed_capacity, config.oracle.processed_fp_rate);

        let queued_conn = citegraph_oracle::connect(&config.redis.url).await?;
        let mut queued = QueuedOracle::new(queued_conn, config.oracle.queued_capacity, config.oracle.queued_fp_rate);

        processed.bootstrap().await?;
        queued.bootstrap().await?;

        let api_key = config.api.api_key.as_ref().map(|s| SecretString::from(s.expose_secret().to_string()));
        let window = Duration::from_secs_f64(config.api.window_secs);
        let api = ApiClient::new(config.api.base_url.clone(), api_key, config.api.requests_per_second, window, cancel.clone())
            .map_err(|e| CitegraphError::Config(format!("building API client: {e}")))?;

        Ok(Self { config, repo, frontier, processed, queued, api, cancel })
    }

    /// Wipes and re-bootstraps both Bloom filters, clears the frontier,
    /// and truncates both relational tables, for `fresh` mode.
    pub async fn reset_stores(&mut self) -> Result<()> {
        self.repo.truncate_all().await?;
        self.processed.reset().await?;
        self.queued.reset().await?;
        self.frontier.clear().await?;
        Ok(())
    }
}
