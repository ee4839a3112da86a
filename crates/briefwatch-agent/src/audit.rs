//! Append-only JSON-lines audit trail of every notification attempt.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::render::NotificationKind;

/// Per-sink delivery outcome recorded in an audit entry.
#[derive(Debug, Clone, Serialize)]
pub struct SinkOutcome {
    pub sink: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One notification attempt. `delivered: false` with empty outcomes means the
/// notification was suppressed by the deduplication window.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub run_id: Uuid,
    pub campaign_id: String,
    pub kind: NotificationKind,
    pub summary: String,
    pub delivered: bool,
    pub outcomes: Vec<SinkOutcome>,
}

/// The audit log file. Writes are best-effort: a failure to record an entry is
/// logged and never interferes with notification delivery.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn append(&self, entry: &AuditEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "audit: failed to serialize entry");
                return;
            }
        };
        if let Err(e) = self.append_line(&line).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "audit: failed to append entry"
            );
        }
    }

    async fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn entry(campaign_id: &str, delivered: bool) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            at: Utc::now(),
            run_id: Uuid::new_v4(),
            campaign_id: campaign_id.to_string(),
            kind: NotificationKind::Insufficient,
            summary: "1 of 4 required variants".to_string(),
            delivered,
            outcomes: vec![SinkOutcome {
                sink: "console".to_string(),
                ok: true,
                error: None,
            }],
        }
    }

    #[tokio::test]
    async fn appends_one_json_line_per_entry() {
        let tmp = TempDir::new().unwrap();
        let log = AuditLog::new(tmp.path().join("audit.jsonl"));

        log.append(&entry("summer", true)).await;
        log.append(&entry("winter", false)).await;

        let contents = std::fs::read_to_string(tmp.path().join("audit.jsonl")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["campaign_id"], "summer");
        assert_eq!(first["kind"], "insufficient");
        assert_eq!(first["delivered"], true);
        assert_eq!(first["outcomes"][0]["sink"], "console");
        assert_eq!(first["outcomes"][0]["ok"], true);
        assert!(first["outcomes"][0].get("error").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["delivered"], false);
    }

    #[tokio::test]
    async fn unwritable_path_does_not_panic() {
        let tmp = TempDir::new().unwrap();
        let log = AuditLog::new(tmp.path().join("missing-dir").join("audit.jsonl"));
        log.append(&entry("summer", true)).await;
    }
}
