use crate::config::LoggingConfig;
use std::sync::OnceLock;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "GRIDPATH_LOG";

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber.
/// Later calls are no-ops, so binaries and tests may call this freely.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if LOGGING_INIT.get().is_some() {
        return Ok(());
    }

    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.log_level.clone());
    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);
    if config.json {
        builder.json().try_init()?;
    } else {
        builder.compact().try_init()?;
    }
    LOGGING_INIT.set(()).ok();

    info!(level = level.as_str(), json = config.json, "logging initialized");
    Ok(())
}
