//! Logging initialisation for the `lcbridge` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "lcbridge_algo=info,lcbridge_reader=info,warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Environment variables:
    /// - `LCBRIDGE_LOG_FORMAT`: `json` or `pretty` (default: pretty)
    /// - `RUST_LOG`: standard filter directives, read at init time
    pub fn from_env() -> Self {
        let format = match std::env::var("LCBRIDGE_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            format,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to init subscriber: {0}")]
pub struct LoggingError(String);

/// Install the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    result.map_err(|e| LoggingError(e.to_string()))?;

    tracing::debug!(format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.default_filter.contains("lcbridge_algo=info"));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to init subscriber"));
    }
}
