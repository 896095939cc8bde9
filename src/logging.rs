//! Logging initialization.
//!
//! TUI mode: logs to `.agentic-credit/logs/agentic-credit-{datetime}.log`
//! CLI mode: logs to stderr

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes buffered log lines when dropped; keep alive for the whole run.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in TUI mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

impl LoggingHandle {
    /// Log file worth pointing the user at on exit
    pub fn non_empty_log_file(&self) -> Option<&Path> {
        let path = self.log_file_path.as_deref()?;
        let len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        (len > 0).then_some(path)
    }
}

/// File name for a session log started now
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("agentic-credit-{}.log", timestamp)
}

/// Effective filter directive: `--debug` wins, then the configured level.
/// `RUST_LOG` still overrides both.
pub fn level_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Initialize logging based on mode and configuration.
///
/// Returns a [`LoggingHandle`] that must outlive the program's work.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let log_level = level_directive(config, debug_override);
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(log_level));

    if is_tui_mode && config.logging.to_file {
        // The terminal belongs to the TUI, so logs go to a file
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

        let log_filename = log_file_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("agentic-credit-"));
        assert!(name.ends_with("Z.log"));
    }

    #[test]
    fn test_debug_flag_overrides_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();

        assert_eq!(level_directive(&config, false), "warn");
        assert_eq!(level_directive(&config, true), "debug");
    }

    #[test]
    fn test_empty_log_file_not_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(log_file_name());
        std::fs::write(&path, "").unwrap();

        let handle = LoggingHandle {
            _guard: None,
            log_file_path: Some(path.clone()),
        };
        assert!(handle.non_empty_log_file().is_none());

        std::fs::write(&path, "line\n").unwrap();
        assert_eq!(handle.non_empty_log_file(), Some(path.as_path()));
    }

    #[test]
    fn test_cli_mode_has_no_log_file() {
        let handle = LoggingHandle {
            _guard: None,
            log_file_path: None,
        };
        assert!(handle.non_empty_log_file().is_none());
    }
}
