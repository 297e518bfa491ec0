//! The `--export` entrypoint: dumps the citations and processed-papers
//! tables to CSV for the downstream PageRank collaborator. Only needs a
//! Postgres connection — no Redis frontier/oracle and no API client are
//! built for this path.

use std::path::Path;

use citegraph_common::{CitegraphError, Config, Result};
use tracing::info;

/// Connects to Postgres and writes `citations.csv` and
/// `processed_papers.csv` into `dir`, creating it if missing.
pub async fn run_export(config: &Config, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| CitegraphError::Config(format!("creating {}: {e}", dir.display())))?;

    let pool =
        citegraph_db::connect(&config.database.url, config.database.max_connections, config.database.min_connections)
            .await?;

    let citations_path = dir.join("citations.csv");
    let citation_rows = citegraph_db::export_citations(&pool, &citations_path).await?;
    info!(rows = citation_rows, path = %citations_path.display(), "exported citations");

    let papers_path = dir.join("processed_papers.csv");
    let paper_rows = citegraph_db::export_processed_papers(&pool, &papers_path).await?;
    info!(rows = paper_rows, path = %papers_path.display(), "exported processed papers");

    Ok(())
}
