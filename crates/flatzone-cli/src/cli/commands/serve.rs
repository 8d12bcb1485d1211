//! `flatzone serve` - run the DNS server.

use anyhow::{Context, Result};
use flatzone_srv::{server, ZoneEngine};
use std::sync::Arc;
use tracing::{error, info};

use crate::cli::args::ServeArgs;

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.server_config().context("failed to load server config")?;
    config.validate()?;

    let engine = Arc::new(ZoneEngine::new(config));
    server::run(engine, shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}
