///! Logging configuration module
///! Console output plus an optional rotating JSON log file

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "dbdeploy.log";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
    /// Log file rotation policy
    pub rotation: LogRotation,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/dbdeploy"),
            file_logging_enabled: false,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Initialize the global subscriber
    ///
    /// The returned guard flushes the file writer on drop and must be held
    /// for as long as the process logs.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .with_writer(io::stdout);

        let guard = if self.file_logging_enabled {
            let file_appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(&self.log_dir, LOG_FILE_NAME),
                LogRotation::Daily => rolling::daily(&self.log_dir, LOG_FILE_NAME),
                LogRotation::Never => rolling::never(&self.log_dir, LOG_FILE_NAME),
            };

            let (non_blocking, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;

            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()?;

            None
        };

        tracing::info!(
            level = %self.level,
            file_logging = self.file_logging_enabled,
            "Logging initialized"
        );

        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.file_logging_enabled);
        assert!(matches!(config.rotation, LogRotation::Daily));
    }

    #[test]
    fn test_rotation_serde() {
        let config: LoggingConfig = toml::from_str("rotation = \"hourly\"").unwrap();
        assert!(matches!(config.rotation, LogRotation::Hourly));
        assert_eq!(config.level, "info");
    }
}
