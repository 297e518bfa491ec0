//! CSV export for the downstream PageRank collaborator. Streams
//! straight from Postgres rather than buffering the whole table in
//! memory — both tables can run into the tens of millions of rows.

use citegraph_common::{CitegraphError, Result};
use futures_util::TryStreamExt;
use sqlx::PgPool;
use std::path::Path;

/// Writes `citing_id,cited_id` rows to `path`.
pub async fn export_citations(pool: &PgPool, path: impl AsRef<Path>) -> Result<u64> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|e| CitegraphError::Config(format!("opening {}: {e}", path.as_ref().display())))?;
    writer
        .write_record(["citing_id", "cited_id"])
        .map_err(|e| CitegraphError::Config(e.to_string()))?;

    let mut rows = sqlx::query_as::<_, (String, String)>("SELECT citing_id, cited_id FROM citations").fetch(pool);

    let mut count = 0u64;
    while let Some((citing_id, cited_id)) = rows.try_next().await? {
        writer
            .write_record([&citing_id, &cited_id])
            .map_err(|e| CitegraphError::Config(e.to_string()))?;
        count += 1;
    }
    writer.flush().map_err(|e| CitegraphError::Config(e.to_string()))?;
    Ok(count)
}

/// Writes `paper_id,fields_of_study` rows to `path`. `fields_of_study`
/// is emitted in Postgres's native array literal form (`{a,b,c}`) — the
/// consumer's own cleanup step already expects that format.
pub async fn export_processed_papers(pool: &PgPool, path: impl AsRef<Path>) -> Result<u64> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|e| CitegraphError::Config(format!("opening {}: {e}", path.as_ref().display())))?;
    writer
        .write_record(["paper_id", "fields_of_study"])
        .map_err(|e| CitegraphError::Config(e.to_string()))?;

    let mut rows =
        sqlx::query_as::<_, (String, Vec<String>)>("SELECT paper_id, fields_of_study FROM processed_papers")
            .fetch(pool);

    let mut count = 0u64;
    while let Some((paper_id, fields)) = rows.try_next().await? {
        writer
            .write_record([paper_id.as_str(), &array_literal(&fields)])
            .map_err(|e| CitegraphError::Config(e.to_string()))?;
        count += 1;
    }
    writer.flush().map_err(|e| CitegraphError::Config(e.to_string()))?;
    Ok(count)
}

fn array_literal(fields: &[String]) -> String {
    let joined = fields.iter().map(|f| format!("\"{}\"", f.replace('"', "\\\""))).collect::<Vec<_>>().join(",");
    format!("{{{joined}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_literal_wraps_and_quotes() {
        assert_eq!(array_literal(&["Biology".into(), "Computer Science".into()]), "{\"Biology\",\"Computer Science\"}");
    }

    #[test]
    fn array_literal_handles_empty() {
        assert_eq!(array_literal(&[]), "{}");
    }
}
