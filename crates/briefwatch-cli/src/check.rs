//! The `briefwatch check` command: one evaluation pass, a summary table, and
//! an optional JSON report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use briefwatch_agent::PassSummary;
use briefwatch_core::SufficiencyVerdict;

/// # Errors
///
/// Returns an error on fatal startup problems (configuration, store roots,
/// sinks), when the brief store cannot be listed, or when the report file
/// cannot be written.
pub async fn run(report: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let config = Arc::new(briefwatch_core::load_app_config()?);
    crate::init_tracing(&config.log_level)?;
    crate::ensure_store_roots(&config)?;

    let mut agent = crate::build_agent(Arc::clone(&config))?;
    let summary = agent.run_once().await.context("evaluation pass failed")?;

    print_summary(&summary);

    if let Some(path) = report {
        write_report(&path, &summary)?;
        println!("\nreport written to {}", path.display());
    }

    if !summary.needs_attention.is_empty() {
        return Ok(ExitCode::from(2));
    }
    if summary.insufficient > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &PassSummary) {
    println!(
        "{:<28} {:>8} {:>8}  STATUS",
        "CAMPAIGN", "OBSERVED", "EXPECTED"
    );
    for verdict in &summary.verdicts {
        let status = if verdict.is_sufficient {
            "ok".to_string()
        } else {
            format!("insufficient ({} missing)", verdict.missing_count())
        };
        println!(
            "{:<28} {:>8} {:>8}  {status}",
            verdict.campaign_id, verdict.observed_count, verdict.expected_count
        );
    }
    for (campaign_id, detail) in &summary.needs_attention {
        println!("{campaign_id:<28} {:>8} {:>8}  needs attention: {detail}", "-", "-");
    }
    if summary.skipped_unavailable > 0 {
        println!(
            "\n{} campaign(s) skipped: store transiently unavailable",
            summary.skipped_unavailable
        );
    }
}

#[derive(Serialize)]
struct Report<'a> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    campaigns_seen: usize,
    evaluated: usize,
    insufficient: usize,
    skipped_unavailable: usize,
    verdicts: &'a [SufficiencyVerdict],
    needs_attention: Vec<AttentionEntry<'a>>,
}

#[derive(Serialize)]
struct AttentionEntry<'a> {
    campaign_id: &'a str,
    detail: &'a str,
}

fn write_report(path: &Path, summary: &PassSummary) -> anyhow::Result<()> {
    let report = Report {
        run_id: summary.run_id,
        generated_at: Utc::now(),
        campaigns_seen: summary.campaigns_seen,
        evaluated: summary.evaluated,
        insufficient: summary.insufficient,
        skipped_unavailable: summary.skipped_unavailable,
        verdicts: &summary.verdicts,
        needs_attention: summary
            .needs_attention
            .iter()
            .map(|(campaign_id, detail)| AttentionEntry {
                campaign_id,
                detail,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)
        .with_context(|| format!("cannot write report to {}", path.display()))?;
    Ok(())
}
