//! Schema bootstrap. No migration framework — the tables are created
//! on startup if absent; there is no prior migration history to replay.

use citegraph_common::{CitegraphError, Result};
use sqlx::PgPool;

pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS processed_papers (
            paper_id        TEXT PRIMARY KEY,
            fields_of_study TEXT[] NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(CitegraphError::from)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS citations (
            citing_id TEXT NOT NULL,
            cited_id  TEXT NOT NULL,
            PRIMARY KEY (citing_id, cited_id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(CitegraphError::from)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cited ON citations (cited_id)")
        .execute(pool)
        .await
        .map_err(CitegraphError::from)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_citing ON citations (citing_id)")
        .execute(pool)
        .await
        .map_err(CitegraphError::from)?;

    Ok(())
}
