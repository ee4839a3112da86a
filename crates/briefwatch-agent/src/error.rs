use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid brief for campaign {campaign_id}: {reason}")]
    InvalidBrief { campaign_id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned HTTP {status}")]
    UnexpectedStatus { status: u16 },
}
