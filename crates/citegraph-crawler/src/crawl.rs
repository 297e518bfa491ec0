//! The crawl loop: drain the frontier in batches, resolve each
//! paper's references through the citation API, and feed newly
//! discovered ids back into the frontier.

use citegraph_api::protocol::{fetch_reference_pages, parse_batch_response};
use citegraph_common::{CitationEdge, FrontierEntry, PaperId, ProcessedPaper, Result};
use tracing::{info, instrument, warn};

use crate::context::Context;

const REFERENCES_FIELDS: &str = "paperId,referenceCount,fieldsOfStudy,references.paperId";
const EMPTY_FRONTIER_SLEEP: std::time::Duration = std::time::Duration::from_secs(1);

/// The outcome of one iteration, for the lifecycle loop to act on.
pub enum IterationOutcome {
    /// The frontier had nothing to pop; caller should sleep and retry.
    /// An empty frontier is not a termination signal — another worker
    /// may still be pushing new ids.
    FrontierEmpty,
    /// One or more ids were popped and (possibly) processed.
    Progressed,
}

/// Runs one iteration: pop a batch, resolve it, write results, seed the
/// frontier with newly discovered ids.
#[instrument(skip(ctx))]
pub async fn run_iteration(ctx: &mut Context) -> Result<IterationOutcome> {
    let batch_size = ctx.config.crawl.batch_size;
    let popped = ctx.frontier.pop_up_to(batch_size).await?;
    if popped.is_empty() {
        tokio::time::sleep(EMPTY_FRONTIER_SLEEP).await;
        return Ok(IterationOutcome::FrontierEmpty);
    }

    let ids: Vec<PaperId> = popped.into_iter().map(|e| e.id).collect();
    let new_ids = dedup_against_processed(ctx, ids).await?;
    if new_ids.is_empty() {
        return Ok(IterationOutcome::Progressed);
    }

    let mut edges = Vec::new();
    let mut processed = Vec::new();

    for chunk in new_ids.chunks(ctx.config.crawl.chunk_size) {
        if ctx.cancel.is_cancelled() {
            break;
        }

        let (chunk_edges, chunk_processed) = resolve_chunk(ctx, chunk).await;
        edges.extend(chunk_edges);
        processed.extend(chunk_processed);
    }

    ctx.repo.insert_citations(&edges).await?;
    ctx.repo.mark_processed(&processed).await?;

    let processed_ids: Vec<PaperId> = processed.iter().map(|p| p.paper_id.clone()).collect();
    ctx.processed.mark_seen(&processed_ids).await?;

    seed_frontier_with_citations(ctx, &edges).await?;

    info!(popped = new_ids.len(), edges = edges.len(), processed = processed.len(), "iteration complete");
    Ok(IterationOutcome::Progressed)
}

/// Splits `ids` against the processed-tier Bloom filter, confirming
/// positives against Postgres before discarding them as duplicates.
async fn dedup_against_processed(ctx: &mut Context, ids: Vec<PaperId>) -> Result<Vec<PaperId>> {
    let (maybe_seen, mut new_ids) = ctx.processed.partition(&ids).await?;
    if !maybe_seen.is_empty() {
        let confirmed = ctx.repo.confirm_processed(&maybe_seen).await?;
        let confirmed_set: std::collections::HashSet<_> = confirmed.into_iter().collect();
        for id in maybe_seen {
            if !confirmed_set.contains(&id) {
                new_ids.push(id);
            }
        }
    }
    Ok(new_ids)
}

/// Fetches batch records for `chunk`, embeds first-page references as
/// edges, and walks overflow pagination for papers with more than 99
/// references.
async fn resolve_chunk(ctx: &Context, chunk: &[PaperId]) -> (Vec<CitationEdge>, Vec<ProcessedPaper>) {
    let path = format!("/paper/batch?fields={REFERENCES_FIELDS}");
    let body = serde_json::json!({ "ids": chunk.iter().map(PaperId::as_str).collect::<Vec<_>>() });

    let response = match ctx.api.post_json(&path, &body).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, chunk_len = chunk.len(), "batch request failed, skipping chunk");
            return (Vec::new(), Vec::new());
        }
    };

    let Some(records) = parse_batch_response(&response) else {
        warn!(chunk_len = chunk.len(), "batch response was not a JSON array, skipping chunk");
        return (Vec::new(), Vec::new());
    };

    let mut edges = Vec::new();
    let mut processed = Vec::new();

    for record in records {
        let mut refs = record.embedded_references.clone();

        if record.needs_pagination() {
            let overflow = fetch_reference_pages(&ctx.api, &record.paper_id, 99, record.reference_count, || {
                ctx.cancel.is_cancelled()
            })
            .await;
            refs.extend(overflow);
        }

        edges.extend(refs.into_iter().map(|cited| CitationEdge::new(record.paper_id.clone(), cited)));
        processed.push(ProcessedPaper { paper_id: record.paper_id, fields_of_study: record.fields_of_study });
    }

    (edges, processed)
}

/// Feeds newly discovered cited ids back into the frontier, guarding
/// against both the processed tier (authoritative-eventually, via the
/// same confirm-against-Postgres path as the initial pop-time filter)
/// and the advisory queued tier so the same id isn't pushed twice.
async fn seed_frontier_with_citations(ctx: &mut Context, edges: &[CitationEdge]) -> Result<()> {
    let mut cited: Vec<PaperId> = edges.iter().map(|e| e.cited_id.clone()).collect();
    cited.sort();
    cited.dedup();
    if cited.is_empty() {
        return Ok(());
    }

    let unprocessed = dedup_against_processed(ctx, cited).await?;
    let newly_queued = ctx.queued.test_and_add(&unprocessed).await?;
    if newly_queued.is_empty() {
        return Ok(());
    }

    let entries: Vec<FrontierEntry> = newly_queued.into_iter().map(FrontierEntry::new).collect();
    ctx.frontier.push_many(&entries).await
}
