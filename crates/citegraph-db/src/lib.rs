//! citegraph-db — Postgres-backed schema bootstrap, the transactional
//! batch writer, and the downstream CSV export.

mod export;
mod retry;
mod schema;
mod writer;

pub use export::{export_citations, export_processed_papers};
pub use schema::ensure_schema;
pub use writer::Repository;

use citegraph_common::{CitegraphError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connects to Postgres and ensures the schema exists before the pool
/// is handed to callers.
pub async fn connect(database_url: &str, max_connections: u32, min_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect(database_url)
        .await
        .map_err(CitegraphError::from)?;
    schema::ensure_schema(&pool).await?;
    Ok(pool)
}
