//! Sinks used by the crate's own tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::render::Notification;
use crate::sink::NotificationSink;
use crate::SinkError;

/// Captures delivered notifications for assertions.
pub(crate) struct RecordingSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub(crate) fn new() -> (Self, Arc<Mutex<Vec<Notification>>>) {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                delivered: Arc::clone(&delivered),
            },
            delivered,
        )
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        self.delivered
            .lock()
            .expect("recording sink lock")
            .push(notification.clone());
        Ok(())
    }
}

/// Always fails; proves one sink's failure never blocks the rest.
pub(crate) struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _notification: &Notification) -> Result<(), SinkError> {
        Err(SinkError::UnexpectedStatus { status: 503 })
    }
}
