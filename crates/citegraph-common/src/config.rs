//! Configuration loading for the crawler worker.
//! Reads `citegraph.toml` from the current directory, or the path named
//! by the `CITEGRAPH_CONFIG` environment variable. Secrets (API keys,
//! DB/Redis URLs) are read from the environment via `dotenvy`, never
//! defaulted.

use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{CitegraphError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/citegraph".to_string())
}
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { url: default_redis_url() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: f64,
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

fn default_api_base_url() -> String { "https://api.semanticscholar.org/graph/v1".to_string() }
fn default_requests_per_second() -> u32 { 1 }
fn default_window_secs() -> f64 { 1.0 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            requests_per_second: default_requests_per_second(),
            window_secs: default_window_secs(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_processed_capacity")]
    pub processed_capacity: u64,
    #[serde(default = "default_processed_fp_rate")]
    pub processed_fp_rate: f64,
    #[serde(default = "default_queued_capacity")]
    pub queued_capacity: u64,
    #[serde(default = "default_queued_fp_rate")]
    pub queued_fp_rate: f64,
}

fn default_processed_capacity() -> u64 { 100_000_000 }
fn default_processed_fp_rate() -> f64 { 0.000_001 }
fn default_queued_capacity() -> u64 { 100_000_000 }
fn default_queued_fp_rate() -> f64 { 0.000_01 }

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            processed_capacity: default_processed_capacity(),
            processed_fp_rate: default_processed_fp_rate(),
            queued_capacity: default_queued_capacity(),
            queued_fp_rate: default_queued_fp_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_commit_every")]
    pub commit_every: u32,
}

fn default_batch_size() -> usize { 100 }
fn default_chunk_size() -> usize { 100 }
fn default_commit_every() -> u32 { 5 }

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            chunk_size: default_chunk_size(),
            commit_every: default_commit_every(),
        }
    }
}

impl Config {
    /// Load from `CITEGRAPH_CONFIG` (or `citegraph.toml` in the current
    /// directory) if present, falling back to defaults otherwise; then
    /// layer environment-provided secrets on top.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var("CITEGRAPH_CONFIG").unwrap_or_else(|_| "citegraph.toml".to_string());
        let mut config = if Path::new(&path).exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CitegraphError::Config(format!("reading {path}: {e}")))?;
            toml::from_str(&text).map_err(|e| CitegraphError::Config(format!("parsing {path}: {e}")))?
        } else {
            Config::default()
        };

        config.api.api_key = std::env::var("CITEGRAPH_API_KEY").ok().map(SecretString::from);
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            api: ApiConfig::default(),
            oracle: OracleConfig::default(),
            crawl: CrawlConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_bounds_are_1_and_10() {
        let db = DatabaseConfig::default();
        assert_eq!(db.min_connections, 1);
        assert_eq!(db.max_connections, 10);
    }

    #[test]
    fn default_rate_limit_is_one_per_second() {
        let api = ApiConfig::default();
        assert_eq!(api.requests_per_second, 1);
        assert_eq!(api.window_secs, 1.0);
    }

    #[test]
    fn default_oracle_bounds_meet_capacity_and_fpr_targets() {
        let oracle = OracleConfig::default();
        assert!(oracle.processed_capacity >= 100_000_000);
        assert!(oracle.processed_fp_rate <= 0.000_001);
        assert!(oracle.queued_capacity >= 100_000_000);
        assert!(oracle.queued_fp_rate <= 0.000_01);
    }

    #[test]
    fn default_crawl_batch_and_chunk_are_one_hundred() {
        let crawl = CrawlConfig::default();
        assert_eq!(crawl.batch_size, 100);
        assert_eq!(crawl.chunk_size, 100);
        assert_eq!(crawl.commit_every, 5);
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            requests_per_second = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api.requests_per_second, 5);
        assert_eq!(config.crawl.batch_size, 100);
    }
}
