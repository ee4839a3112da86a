//! The `briefwatch watch` command: run the monitoring loop until signalled.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

/// # Errors
///
/// Returns an error when configuration cannot be loaded, a store root does
/// not resolve, or a sink cannot be built — the fatal startup cases. Once the
/// loop is running, store and sink trouble is handled cycle by cycle and
/// never ends the process.
pub async fn run() -> anyhow::Result<()> {
    let config = Arc::new(briefwatch_core::load_app_config()?);
    crate::init_tracing(&config.log_level)?;
    crate::ensure_store_roots(&config)?;
    tracing::info!(config = ?config, "briefwatch starting");

    let agent = crate::build_agent(Arc::clone(&config))?;

    let (stop_tx, stop_rx) = watch::channel(false);
    // External change notifications may feed this channel; polling alone
    // carries the liveness guarantee, so nothing sends on it today.
    let (_trigger_tx, trigger_rx) = mpsc::channel(8);

    let loop_task = tokio::spawn(agent.run(stop_rx, trigger_rx));

    shutdown_signal().await;
    let _ = stop_tx.send(true);

    let state = loop_task.await?;
    tracing::info!(
        campaigns = state.campaign_count(),
        "briefwatch stopped cleanly"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
