//! Shared domain types: the paper identifier, the frontier envelope, and
//! the citation edge/processed-paper tuples from the data model.

use serde::{Deserialize, Serialize};

/// An opaque, non-empty paper identifier. Identity is byte-equality
/// after trimming surrounding whitespace and stray quote characters —
/// `normalize` applies that rule so callers never compare raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperId(pub String);

impl PaperId {
    pub fn normalize(raw: impl AsRef<str>) -> Self {
        PaperId(raw.as_ref().trim().trim_matches('"').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PaperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PaperId {
    fn from(s: String) -> Self {
        PaperId::normalize(s)
    }
}

impl From<&str> for PaperId {
    fn from(s: &str) -> Self {
        PaperId::normalize(s)
    }
}

/// A self-describing frontier envelope. Forward-compatible fields can be
/// added without breaking entries already sitting in the queue — unknown
/// fields on read are ignored via serde's default behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierEntry {
    pub id: PaperId,
}

impl FrontierEntry {
    pub fn new(id: impl Into<PaperId>) -> Self {
        Self { id: id.into() }
    }
}

/// A processed paper's immutable record: id plus ordered fields-of-study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPaper {
    pub paper_id: PaperId,
    pub fields_of_study: Vec<String>,
}

/// A single directional citation edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CitationEdge {
    pub citing_id: PaperId,
    pub cited_id: PaperId,
}

impl CitationEdge {
    pub fn new(citing_id: PaperId, cited_id: PaperId) -> Self {
        Self { citing_id, cited_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace_and_quotes() {
        assert_eq!(PaperId::normalize("  \"abc123\"  ").as_str(), "abc123");
        assert_eq!(PaperId::normalize("abc123"), PaperId::normalize(" abc123 "));
    }

    #[test]
    fn frontier_entry_roundtrips_through_json() {
        let entry = FrontierEntry::new("P1");
        let json = serde_json::to_string(&entry).unwrap();
        let back: FrontierEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn frontier_entry_ignores_unknown_fields() {
        let json = r#"{"id": "P1", "priority": 3}"#;
        let entry: FrontierEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "P1");
    }
}
