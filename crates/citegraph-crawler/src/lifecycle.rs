//! The lifecycle controller: `fresh` vs `resume` mode arbitration and
//! signal-driven graceful shutdown.

use citegraph_common::{CitegraphError, FrontierEntry, PaperId, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::context::Context;
use crate::crawl::{run_iteration, IterationOutcome};

pub enum StartMode {
    /// Wipe the advisory stores and the frontier, then seed it with the
    /// given ids. The authoritative Postgres tables are left alone.
    Fresh { seeds: Vec<PaperId> },
    /// Continue from whatever is already sitting in the frontier. Fatal
    /// if the frontier is empty — there is nothing to arbitrate.
    Resume,
}

/// Brings the stores into the requested starting state.
pub async fn arbitrate(ctx: &mut Context, mode: StartMode) -> Result<()> {
    match mode {
        StartMode::Fresh { seeds } => {
            ctx.reset_stores().await?;
            if !seeds.is_empty() {
                // Route seeds through the queued oracle exactly like any
                // other candidate — repeated seeds collapse to a single
                // frontier entry.
                let newly_queued = ctx.queued.test_and_add(&seeds).await?;
                let entries: Vec<FrontierEntry> = newly_queued.into_iter().map(FrontierEntry::new).collect();
                ctx.frontier.push_many(&entries).await?;
            }
            info!("started in fresh mode");
        }
        StartMode::Resume => {
            let len = ctx.frontier.length().await?;
            if len == 0 {
                return Err(CitegraphError::Config(
                    "resume mode requires a non-empty frontier; nothing to resume from".into(),
                ));
            }
            info!(frontier_len = len, "resumed from existing frontier");
        }
    }
    Ok(())
}

/// Installs SIGINT/SIGTERM handlers that trip `cancel`, then drives the
/// crawl loop at every batch boundary until shutdown is requested. An
/// empty frontier is not a stopping condition — other workers sharing
/// the same frontier may still be feeding it.
///
/// Per-paper API failures never reach here — `resolve_chunk` already
/// logs and swallows them so the chunk is simply dropped. An error
/// surfacing out of `run_iteration` is therefore always a store/DB/
/// oracle failure (connection pool exhausted, Redis unreachable,
/// deadlock retries exhausted, a malformed frontier payload) and is
/// propagated so the worker exits nonzero rather than spinning forever
/// against a dead dependency.
pub async fn run(ctx: &mut Context, cancel: CancellationToken) -> Result<()> {
    install_signal_handlers(cancel.clone());

    loop {
        if cancel.is_cancelled() {
            info!("shutdown requested, stopping at batch boundary");
            break;
        }

        match run_iteration(ctx).await {
            Ok(IterationOutcome::Progressed) | Ok(IterationOutcome::FrontierEmpty) => {}
            Err(e) => {
                error!(error = %e, "store/DB/oracle failure, worker exiting");
                return Err(e);
            }
        }
    }

    Ok(())
}

fn install_signal_handlers(cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
            _ = sigterm.recv() => info!("received SIGTERM"),
        }
        cancel.cancel();
    });
}
