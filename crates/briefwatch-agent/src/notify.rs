//! Fan-out of rendered notifications to sinks, with suppression-window
//! deduplication and audit logging.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditLog, SinkOutcome};
use crate::render::Notification;
use crate::sink::NotificationSink;

/// Owns the configured sinks and the deduplication cache.
///
/// The cache is keyed on each notification's stable dedup key; it is mutated
/// only by the task that owns this notifier (the watch loop), so no locking
/// is needed.
pub struct Notifier {
    sinks: Vec<Box<dyn NotificationSink>>,
    audit: AuditLog,
    suppression_window: Duration,
    delivered: HashMap<String, Instant>,
}

impl Notifier {
    #[must_use]
    pub fn new(
        sinks: Vec<Box<dyn NotificationSink>>,
        audit: AuditLog,
        suppression_window: Duration,
    ) -> Self {
        Self {
            sinks,
            audit,
            suppression_window,
            delivered: HashMap::new(),
        }
    }

    /// Deliver `notification` to every configured sink, unless an identical
    /// one (same dedup key) was already delivered within the suppression
    /// window.
    ///
    /// One sink's failure never blocks the others and never propagates out of
    /// here; every attempt — delivered or suppressed — is recorded in the
    /// audit log. Returns `true` when the notification was actually
    /// delivered.
    pub async fn notify(&mut self, run_id: Uuid, notification: &Notification) -> bool {
        let now = Instant::now();
        if self.is_suppressed(&notification.dedup_key, now) {
            tracing::debug!(
                campaign = %notification.campaign_id,
                kind = %notification.kind,
                "notifier: duplicate within suppression window; not re-sending"
            );
            self.audit
                .append(&self.entry(run_id, notification, false, Vec::new()))
                .await;
            return false;
        }

        let mut outcomes = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            match sink.deliver(notification).await {
                Ok(()) => outcomes.push(SinkOutcome {
                    sink: sink.name().to_string(),
                    ok: true,
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!(
                        sink = sink.name(),
                        campaign = %notification.campaign_id,
                        error = %e,
                        "notifier: sink delivery failed"
                    );
                    outcomes.push(SinkOutcome {
                        sink: sink.name().to_string(),
                        ok: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        self.delivered
            .insert(notification.dedup_key.clone(), now);
        self.audit
            .append(&self.entry(run_id, notification, true, outcomes))
            .await;
        true
    }

    /// Drop expired cache entries. Called once per evaluation pass so the
    /// cache does not grow with every distinct reason set ever alerted on.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        let window = self.suppression_window;
        self.delivered
            .retain(|_, at| now.duration_since(*at) < window);
    }

    fn is_suppressed(&self, dedup_key: &str, now: Instant) -> bool {
        self.delivered
            .get(dedup_key)
            .is_some_and(|at| now.duration_since(*at) < self.suppression_window)
    }

    fn entry(
        &self,
        run_id: Uuid,
        notification: &Notification,
        delivered: bool,
        outcomes: Vec<SinkOutcome>,
    ) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            at: Utc::now(),
            run_id,
            campaign_id: notification.campaign_id.clone(),
            kind: notification.kind,
            summary: notification.subject.clone(),
            delivered,
            outcomes,
        }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
