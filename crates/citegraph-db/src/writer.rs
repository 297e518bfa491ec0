//! The transactional batch writer: bulk `ON CONFLICT DO NOTHING`
//! inserts for citation edges and processed-paper marks, each wrapped in
//! the deadlock retry policy. Citations are always committed before the
//! corresponding processed marks — a crash between the two leaves edges
//! without their mark, which a re-crawl simply repeats, rather than a
//! mark without edges, which would be silently lost.

use citegraph_common::{CitationEdge, PaperId, ProcessedPaper, Result};
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;

use crate::retry::with_deadlock_retry;

#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Bulk-inserts `edges`, ignoring rows that already exist.
    #[instrument(skip(self, edges), fields(count = edges.len()))]
    pub async fn insert_citations(&self, edges: &[CitationEdge]) -> Result<()> {
        if edges.is_empty() {
            return Ok(());
        }

        with_deadlock_retry(|| async {
            let mut tx = self.pool.begin().await?;

            let mut qb = QueryBuilder::new("INSERT INTO citations (citing_id, cited_id) ");
            qb.push_values(edges, |mut b, edge| {
                b.push_bind(edge.citing_id.as_str()).push_bind(edge.cited_id.as_str());
            });
            qb.push(" ON CONFLICT (citing_id, cited_id) DO NOTHING");
            qb.build().execute(&mut *tx).await?;

            tx.commit().await
        })
        .await
    }

    /// Bulk-inserts processed-paper rows, ignoring ones already marked.
    #[instrument(skip(self, papers), fields(count = papers.len()))]
    pub async fn mark_processed(&self, papers: &[ProcessedPaper]) -> Result<()> {
        if papers.is_empty() {
            return Ok(());
        }

        with_deadlock_retry(|| async {
            let mut tx = self.pool.begin().await?;

            let mut qb = QueryBuilder::new("INSERT INTO processed_papers (paper_id, fields_of_study) ");
            qb.push_values(papers, |mut b, p| {
                b.push_bind(p.paper_id.as_str()).push_bind(&p.fields_of_study);
            });
            qb.push(" ON CONFLICT (paper_id) DO NOTHING");
            qb.build().execute(&mut *tx).await?;

            tx.commit().await
        })
        .await
    }

    /// Wipes both tables, for `fresh` mode. Not retried on deadlock —
    /// this only ever runs once at startup, before any worker's crawl
    /// loop is writing concurrently.
    #[instrument(skip(self))]
    pub async fn truncate_all(&self) -> Result<()> {
        sqlx::query("TRUNCATE TABLE citations, processed_papers").execute(&self.pool).await?;
        Ok(())
    }

    /// Authoritative confirmation for the subset of `candidates` the
    /// processed-tier Bloom filter reported as (possibly falsely)
    /// present. Returns the ones genuinely already processed.
    #[instrument(skip(self, candidates))]
    pub async fn confirm_processed(&self, candidates: &[PaperId]) -> Result<Vec<PaperId>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<&str> = candidates.iter().map(PaperId::as_str).collect();
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT paper_id FROM processed_papers WHERE paper_id = ANY($1)")
                .bind(&ids as &[&str])
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| PaperId::from(id)).collect())
    }
}
