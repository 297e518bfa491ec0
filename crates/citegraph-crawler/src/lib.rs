//! citegraph-crawler — the crawl loop, lifecycle controller, and CSV
//! export entrypoint, wired together behind the `citegraph-worker`
//! binary.

pub mod cli;
pub mod context;
pub mod crawl;
pub mod export;
pub mod lifecycle;

pub use cli::Cli;
pub use context::Context;
pub use crawl::run_iteration;
pub use export::run_export;
pub use lifecycle::{arbitrate, run, StartMode};
