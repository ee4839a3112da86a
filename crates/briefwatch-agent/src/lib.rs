pub mod audit;
pub mod error;
pub mod evaluate;
pub mod notify;
pub mod render;
pub mod sink;
pub mod watch;

pub use audit::{AuditEntry, AuditLog, SinkOutcome};
pub use error::{EvalError, SinkError};
pub use evaluate::evaluate;
pub use notify::Notifier;
pub use render::{Notification, NotificationKind};
pub use sink::{ConsoleSink, FileSink, NotificationSink, WebhookSink};
pub use watch::{Agent, PassSummary, WatchState};

#[cfg(test)]
pub(crate) mod test_sinks;
