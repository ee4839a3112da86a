//! Notification delivery targets.
//!
//! Sinks are deliberately dumb: they take a rendered [`Notification`] and
//! either deliver it or fail. Isolation between sinks (one failure never
//! blocks the rest) lives in the notifier, not here.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::render::Notification;
use crate::SinkError;

#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError>;
}

/// Writes notifications to stdout.
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        println!("{}\n{}", notification.subject, notification.body);
        Ok(())
    }
}

/// Appends notifications to an alert log file.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl NotificationSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        let io_err = |source: std::io::Error| SinkError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        let block = format!("{}\n{}\n", notification.subject, notification.body);
        file.write_all(block.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}

/// POSTs notifications as JSON to a configured webhook endpoint.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the HTTP client cannot be
    /// built.
    pub fn new(url: String, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        let payload = serde_json::json!({
            "campaign_id": notification.campaign_id,
            "kind": notification.kind,
            "subject": notification.subject,
            "body": notification.body,
        });
        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
