//! citegraph-worker — a single crawler worker process. Exactly one
//! of `--fresh`/`--resume`/`--export` selects the run mode; multiple
//! workers on separate hosts point at the same Postgres/Redis pair and
//! share one logical frontier and dedup oracle.

use citegraph_crawler::{arbitrate, lifecycle, run_export, Cli, Context, StartMode};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("citegraph=info,warn")))
        .init();

    let cli = Cli::parse();

    let config = match citegraph_common::Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &cli.export {
        return match run_export(&config, dir).await {
            Ok(()) => {
                info!("citegraph-worker export complete");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "export failed");
                std::process::ExitCode::FAILURE
            }
        };
    }

    let cancel = CancellationToken::new();

    let mut ctx = match Context::build(config, cancel.clone()).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to initialize worker context");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mode = if cli.fresh {
        StartMode::Fresh { seeds: cli.seed_ids() }
    } else {
        StartMode::Resume
    };

    if let Err(e) = arbitrate(&mut ctx, mode).await {
        error!(error = %e, "startup arbitration failed");
        return std::process::ExitCode::FAILURE;
    }

    info!("citegraph-worker starting crawl loop");
    match lifecycle::run(&mut ctx, cancel).await {
        Ok(()) => {
            info!("citegraph-worker shut down cleanly");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "crawl loop exited with a fatal error");
            std::process::ExitCode::FAILURE
        }
    }
}
