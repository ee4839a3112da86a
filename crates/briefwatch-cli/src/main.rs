mod check;
mod validate;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use briefwatch_agent::{
    Agent, AuditLog, ConsoleSink, FileSink, NotificationSink, Notifier, WatchState, WebhookSink,
};
use briefwatch_core::{AppConfig, SinkKind};

#[derive(Debug, Parser)]
#[command(name = "briefwatch")]
#[command(about = "Campaign asset sufficiency monitoring agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Watch the brief store and alert on insufficient campaigns.
    Watch,
    /// Run a single evaluation pass and print a per-campaign summary.
    Check {
        /// Write the full verdict list to a JSON report file.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Parse and validate a single brief file.
    Validate {
        /// Path to the brief file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch => {
            watch::run().await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { report } => check::run(report).await,
        Commands::Validate { file } => validate::run(&file),
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

/// Startup validation: both store roots must resolve, or the process exits.
/// Transient unavailability mid-run is tolerated cycle by cycle instead.
fn ensure_store_roots(config: &AppConfig) -> anyhow::Result<()> {
    for (name, path) in [
        ("brief store", &config.brief_dir),
        ("asset store", &config.asset_dir),
    ] {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("{name} path {} cannot be resolved", path.display()))?;
        anyhow::ensure!(
            metadata.is_dir(),
            "{name} path {} is not a directory",
            path.display()
        );
    }
    Ok(())
}

fn build_sinks(config: &AppConfig) -> anyhow::Result<Vec<Box<dyn NotificationSink>>> {
    let mut sinks: Vec<Box<dyn NotificationSink>> = Vec::with_capacity(config.sinks.len());
    for kind in &config.sinks {
        match kind {
            SinkKind::Console => sinks.push(Box::new(ConsoleSink)),
            SinkKind::File => {
                let path = config
                    .alert_log_path
                    .clone()
                    .context("file sink enabled but BRIEFWATCH_ALERT_LOG_PATH is not set")?;
                sinks.push(Box::new(FileSink::new(path)));
            }
            SinkKind::Webhook => {
                let url = config
                    .webhook_url
                    .clone()
                    .context("webhook sink enabled but BRIEFWATCH_WEBHOOK_URL is not set")?;
                sinks.push(Box::new(
                    WebhookSink::new(url, config.webhook_timeout_secs)
                        .context("failed to build webhook HTTP client")?,
                ));
            }
        }
    }
    Ok(sinks)
}

fn build_agent(config: Arc<AppConfig>) -> anyhow::Result<Agent> {
    let sinks = build_sinks(&config)?;
    let notifier = Notifier::new(
        sinks,
        AuditLog::new(config.audit_log_path.clone()),
        Duration::from_secs(config.suppression_window_secs),
    );
    Ok(Agent::new(config, notifier, WatchState::new()))
}
