//! Batch-record parsing and the reference pagination sub-protocol.
//!
//! The batch endpoint's response is dynamically-typed JSON; instead of
//! duck-typed field access we parse into an explicit tagged shape with a
//! named "malformed, skip" branch.

use citegraph_common::PaperId;
use serde::Deserialize;
use tracing::warn;

use crate::client::ApiClient;

const REF_PAGE_LIMIT: u32 = 99;
const MAX_OFFSET: u32 = 9999;
const EMBEDDED_REF_CAP: usize = 99;

#[derive(Debug, Deserialize)]
struct RawReference {
    #[serde(rename = "paperId")]
    paper_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPaperRecord {
    #[serde(rename = "paperId")]
    paper_id: Option<String>,
    #[serde(rename = "referenceCount", default)]
    reference_count: u64,
    #[serde(rename = "fieldsOfStudy", default)]
    fields_of_study: Option<Vec<String>>,
    #[serde(default)]
    references: Vec<RawReference>,
}

/// A successfully-parsed batch record. Records that were `null`, not an
/// object, or lacked a `paperId` are dropped before reaching this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperBatchRecord {
    pub paper_id: PaperId,
    pub reference_count: u64,
    pub fields_of_study: Vec<String>,
    pub embedded_references: Vec<PaperId>,
}

impl PaperBatchRecord {
    /// Dual pagination-trigger predicate: `referenceCount > 99` *and*
    /// the batch already returned >= 99 nested references, including the
    /// asymmetry with `REF_PAGE_LIMIT`.
    pub fn needs_pagination(&self) -> bool {
        self.reference_count > 99 && self.embedded_references.len() > 98
    }
}

/// Parses a batch-endpoint response body. Returns `None` if the body
/// itself is not a JSON array (caller logs and skips the whole chunk).
/// Individual malformed entries (null, non-object, missing `paperId`)
/// are silently dropped from the returned list.
pub fn parse_batch_response(body: &serde_json::Value) -> Option<Vec<PaperBatchRecord>> {
    let entries = body.as_array()?;
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.is_null() {
            continue;
        }
        if !entry.is_object() {
            warn!(?entry, "skipping non-object batch record");
            continue;
        }

        let raw: RawPaperRecord = match serde_json::from_value(entry.clone()) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "skipping malformed batch record");
                continue;
            }
        };

        let Some(paper_id) = raw.paper_id.filter(|s| !s.trim().is_empty()) else {
            continue;
        };

        let embedded_references = raw
            .references
            .into_iter()
            .filter_map(|r| r.paper_id)
            .filter(|s| !s.trim().is_empty())
            .map(PaperId::from)
            .take(EMBEDDED_REF_CAP)
            .collect();

        records.push(PaperBatchRecord {
            paper_id: PaperId::from(paper_id),
            reference_count: raw.reference_count,
            fields_of_study: raw.fields_of_study.unwrap_or_default(),
            embedded_references,
        });
    }

    Some(records)
}

#[derive(Debug, Deserialize)]
struct ReferencePage {
    #[serde(default)]
    data: Vec<RawReference>,
    next: Option<serde_json::Value>,
}

/// Fetches the overflow portion of `pid`'s reference list starting at
/// `start_offset`. Errors are logged and swallowed — the caller marks
/// the paper processed with whatever edges were collected.
pub async fn fetch_reference_pages(
    client: &ApiClient,
    pid: &PaperId,
    start_offset: u32,
    total_refs: u64,
    should_stop: impl Fn() -> bool,
) -> Vec<PaperId> {
    let mut collected = Vec::new();
    let mut offset = start_offset;

    while (offset as u64) < total_refs && offset <= MAX_OFFSET {
        if should_stop() {
            break;
        }

        let path = format!("/paper/{pid}/references");
        let params = [
            ("fields", "paperId".to_string()),
            ("limit", REF_PAGE_LIMIT.to_string()),
            ("offset", offset.to_string()),
        ];

        let body = match client.get_json(&path, &params).await {
            Ok(b) => b,
            Err(e) => {
                warn!(pid = %pid, offset, error = %e, "reference pagination failed, stopping with partial edges");
                break;
            }
        };

        let page: ReferencePage = match serde_json::from_value(body) {
            Ok(p) => p,
            Err(e) => {
                warn!(pid = %pid, offset, error = %e, "malformed reference page, stopping with partial edges");
                break;
            }
        };

        if page.data.is_empty() {
            break;
        }

        collected.extend(
            page.data
                .into_iter()
                .filter_map(|r| r.paper_id)
                .filter(|s| !s.trim().is_empty())
                .map(PaperId::from),
        );

        let next = page.next.as_ref().and_then(|v| v.as_u64()).map(|n| n as u32);
        match next {
            Some(n) if n > offset && n <= MAX_OFFSET => offset = n,
            _ => break,
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_response_must_be_an_array() {
        assert!(parse_batch_response(&json!({"not": "a list"})).is_none());
    }

    #[test]
    fn nulls_and_non_objects_are_dropped() {
        let body = json!([null, "oops", {"paperId": "P1", "referenceCount": 0}]);
        let records = parse_batch_response(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].paper_id.as_str(), "P1");
    }

    #[test]
    fn missing_paper_id_is_dropped() {
        let body = json!([{"referenceCount": 5}]);
        let records = parse_batch_response(&body).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn fields_of_study_defaults_to_empty() {
        let body = json!([{"paperId": "P1"}]);
        let records = parse_batch_response(&body).unwrap();
        assert!(records[0].fields_of_study.is_empty());
    }

    #[test]
    fn embedded_references_collected() {
        let body = json!([{
            "paperId": "P1",
            "referenceCount": 2,
            "references": [{"paperId": "R1"}, {"paperId": null}, {"paperId": "R2"}],
        }]);
        let records = parse_batch_response(&body).unwrap();
        let refs: Vec<_> = records[0].embedded_references.iter().map(|p| p.as_str()).collect();
        assert_eq!(refs, vec!["R1", "R2"]);
    }

    #[test]
    fn needs_pagination_requires_both_conditions() {
        let mut rec = PaperBatchRecord {
            paper_id: PaperId::from("P1"),
            reference_count: 250,
            fields_of_study: vec![],
            embedded_references: (0..99).map(|i| PaperId::from(format!("R{i}"))).collect(),
        };
        assert!(rec.needs_pagination());

        rec.reference_count = 99;
        assert!(!rec.needs_pagination(), "referenceCount must exceed 99, not just equal it");

        rec.reference_count = 250;
        rec.embedded_references.truncate(98);
        assert!(!rec.needs_pagination(), "nested references must exceed 98");
    }
}
