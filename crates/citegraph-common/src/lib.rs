//! citegraph-common — shared types, configuration, and errors used across
//! every citegraph-crawler crate.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{CitegraphError, Result};
pub use types::{CitationEdge, FrontierEntry, PaperId, ProcessedPaper};
