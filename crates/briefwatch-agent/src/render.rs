//! Rendering of verdicts into human-addressed notifications.
//!
//! Kept apart from the evaluator so presentation can change without touching
//! evaluation logic, and so both are testable on their own.

use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

use briefwatch_core::SufficiencyVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Insufficient,
    Resolved,
    NeedsAttention,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Insufficient => write!(f, "insufficient"),
            NotificationKind::Resolved => write!(f, "resolved"),
            NotificationKind::NeedsAttention => write!(f, "needs_attention"),
        }
    }
}

/// A rendered, ready-to-deliver message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub campaign_id: String,
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
    /// Stable identity for suppression-window deduplication.
    pub dedup_key: String,
}

/// Render an insufficiency alert.
///
/// At most `max_reasons` missing variants are listed, with an overflow line
/// naming how many more there are.
#[must_use]
pub fn render_insufficient(verdict: &SufficiencyVerdict, max_reasons: usize) -> Notification {
    let missing = verdict.missing_count();
    let subject = format!(
        "[briefwatch] campaign '{}' below required coverage",
        verdict.campaign_id
    );

    let mut body = format!(
        "Campaign '{}' has {} of {} required variants.\n",
        verdict.campaign_id, verdict.observed_count, verdict.expected_count
    );
    if missing == 0 {
        body.push_str("All required variants are present, but the total is below the campaign's minimum variant threshold.\n");
    } else {
        let _ = writeln!(body, "\nMissing variants ({missing}):");
        for reason in verdict.reasons.iter().take(max_reasons) {
            let _ = writeln!(body, "- {reason}");
        }
        if missing > max_reasons {
            let _ = writeln!(body, "(+{} more)", missing - max_reasons);
        }
    }

    Notification {
        campaign_id: verdict.campaign_id.clone(),
        kind: NotificationKind::Insufficient,
        subject,
        body,
        dedup_key: dedup_key(
            &verdict.campaign_id,
            NotificationKind::Insufficient,
            &verdict.reasons,
        ),
    }
}

/// Render a resolution notice for a campaign that recovered after an alert.
#[must_use]
pub fn render_resolved(verdict: &SufficiencyVerdict) -> Notification {
    let subject = format!(
        "[briefwatch] campaign '{}' recovered",
        verdict.campaign_id
    );
    let body = format!(
        "Campaign '{}' now has {} of {} required variants. No further action needed.\n",
        verdict.campaign_id, verdict.observed_count, verdict.expected_count
    );
    Notification {
        campaign_id: verdict.campaign_id.clone(),
        kind: NotificationKind::Resolved,
        subject,
        body,
        dedup_key: dedup_key(&verdict.campaign_id, NotificationKind::Resolved, &[]),
    }
}

/// Render a needs-attention notice for a brief that could not be evaluated
/// (parse failure or invalid contents). Distinct from insufficiency so the
/// two are never confused.
#[must_use]
pub fn render_needs_attention(campaign_id: &str, detail: &str) -> Notification {
    let subject = format!("[briefwatch] campaign '{campaign_id}' brief needs attention");
    let body = format!(
        "The brief for campaign '{campaign_id}' could not be evaluated:\n{detail}\n\nIt will not be re-checked until the brief file changes.\n"
    );
    Notification {
        campaign_id: campaign_id.to_string(),
        kind: NotificationKind::NeedsAttention,
        subject,
        body,
        dedup_key: dedup_key(
            campaign_id,
            NotificationKind::NeedsAttention,
            &[detail.to_string()],
        ),
    }
}

/// Stable hash of (campaign id, kind, sorted reasons) — the suppression cache key.
fn dedup_key(campaign_id: &str, kind: NotificationKind, reasons: &[String]) -> String {
    let mut sorted: Vec<&str> = reasons.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(campaign_id.as_bytes());
    hasher.update([0]);
    hasher.update(kind.to_string().as_bytes());
    for reason in sorted {
        hasher.update([0]);
        hasher.update(reason.as_bytes());
    }
    hex::encode(hasher.finalize())
}
