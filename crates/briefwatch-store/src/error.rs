use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable at {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store operation timed out after {timeout_secs}s at {path}")]
    Timeout { path: String, timeout_secs: u64 },

    #[error("failed to parse brief {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid brief {path}: {reason}")]
    InvalidBrief { path: String, reason: String },
}

impl StoreError {
    /// `true` for errors that describe the brief's contents rather than the
    /// store being unreachable. Content errors are reported once and not
    /// retried until the file's modification time advances; availability
    /// errors are retried on the next cycle.
    #[must_use]
    pub fn is_brief_content_error(&self) -> bool {
        matches!(
            self,
            StoreError::Parse { .. } | StoreError::InvalidBrief { .. }
        )
    }
}
