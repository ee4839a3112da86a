use crate::app_config::{AppConfig, Environment, SinkKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let brief_dir = PathBuf::from(require("BRIEFWATCH_BRIEF_DIR")?);
    let asset_dir = PathBuf::from(require("BRIEFWATCH_ASSET_DIR")?);

    let env = parse_environment(&or_default("BRIEFWATCH_ENV", "development"));
    let log_level = or_default("BRIEFWATCH_LOG_LEVEL", "info");

    let interval_secs = parse_u64("BRIEFWATCH_INTERVAL_SECS", "60")?;
    if interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRIEFWATCH_INTERVAL_SECS".to_string(),
            reason: "polling interval must be at least 1 second".to_string(),
        });
    }

    // The suppression window defaults to one polling interval.
    let suppression_window_secs = match lookup("BRIEFWATCH_SUPPRESSION_WINDOW_SECS") {
        Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "BRIEFWATCH_SUPPRESSION_WINDOW_SECS".to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => interval_secs,
    };

    let max_reasons_per_message = parse_usize("BRIEFWATCH_MAX_REASONS_PER_MESSAGE", "5")?;

    let default_min_variants = parse_u32("BRIEFWATCH_DEFAULT_MIN_VARIANTS", "1")?;
    if default_min_variants == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRIEFWATCH_DEFAULT_MIN_VARIANTS".to_string(),
            reason: "minimum variant threshold must be at least 1".to_string(),
        });
    }

    let store_timeout_secs = parse_u64("BRIEFWATCH_STORE_TIMEOUT_SECS", "10")?;
    let webhook_timeout_secs = parse_u64("BRIEFWATCH_WEBHOOK_TIMEOUT_SECS", "10")?;

    let sinks = parse_sinks(&or_default("BRIEFWATCH_SINKS", "console"))?;

    let alert_log_path = lookup("BRIEFWATCH_ALERT_LOG_PATH").ok().map(PathBuf::from);
    let webhook_url = lookup("BRIEFWATCH_WEBHOOK_URL").ok();
    let audit_log_path = PathBuf::from(or_default(
        "BRIEFWATCH_AUDIT_LOG_PATH",
        "./briefwatch-audit.jsonl",
    ));

    if sinks.contains(&SinkKind::File) && alert_log_path.is_none() {
        return Err(ConfigError::Validation(
            "BRIEFWATCH_ALERT_LOG_PATH is required when the file sink is enabled".to_string(),
        ));
    }
    if sinks.contains(&SinkKind::Webhook) && webhook_url.is_none() {
        return Err(ConfigError::Validation(
            "BRIEFWATCH_WEBHOOK_URL is required when the webhook sink is enabled".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        brief_dir,
        asset_dir,
        interval_secs,
        suppression_window_secs,
        max_reasons_per_message,
        default_min_variants,
        store_timeout_secs,
        sinks,
        alert_log_path,
        webhook_url,
        webhook_timeout_secs,
        audit_log_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Parse the comma-separated sink list, e.g. `"console,file"`.
fn parse_sinks(raw: &str) -> Result<Vec<SinkKind>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "BRIEFWATCH_SINKS".to_string(),
        reason,
    };

    let mut sinks = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(invalid("empty sink entry".to_string()));
        }
        let kind: SinkKind = part.parse().map_err(invalid)?;
        if sinks.contains(&kind) {
            return Err(invalid(format!("duplicate sink '{kind}'")));
        }
        sinks.push(kind);
    }
    Ok(sinks)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
