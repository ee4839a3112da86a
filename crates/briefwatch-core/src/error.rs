use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum BriefError {
    #[error("brief does not parse as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid brief: {0}")]
    Validation(String),
}
