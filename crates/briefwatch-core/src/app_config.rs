use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// A configured notification delivery target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
    Webhook,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Console => write!(f, "console"),
            SinkKind::File => write!(f, "file"),
            SinkKind::Webhook => write!(f, "webhook"),
        }
    }
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(SinkKind::Console),
            "file" => Ok(SinkKind::File),
            "webhook" => Ok(SinkKind::Webhook),
            other => Err(format!(
                "unknown sink '{other}'; expected console, file, or webhook"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub brief_dir: PathBuf,
    pub asset_dir: PathBuf,
    pub interval_secs: u64,
    pub suppression_window_secs: u64,
    pub max_reasons_per_message: usize,
    pub default_min_variants: u32,
    pub store_timeout_secs: u64,
    pub sinks: Vec<SinkKind>,
    pub alert_log_path: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
    pub audit_log_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("brief_dir", &self.brief_dir)
            .field("asset_dir", &self.asset_dir)
            .field("interval_secs", &self.interval_secs)
            .field("suppression_window_secs", &self.suppression_window_secs)
            .field("max_reasons_per_message", &self.max_reasons_per_message)
            .field("default_min_variants", &self.default_min_variants)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("sinks", &self.sinks)
            .field("alert_log_path", &self.alert_log_path)
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("audit_log_path", &self.audit_log_path)
            .finish()
    }
}
