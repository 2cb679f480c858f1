//! Logging infrastructure for editpulse
//!
//! Logs are written to `~/.local/state/editpulse/editpulse.log` following XDG standards.
//! The configured level applies to the editpulse crates only; dependencies stay at `warn`.

use crate::config::{Config, LoggingConfig};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_NAME: &str = "editpulse.log";

/// Initialize the logging system
///
/// Sets up tracing with a daily rolling file in the XDG state directory.
/// `RUST_LOG`, when set, replaces the level from the config file.
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::error::Error::Config(format!("failed to install logger: {}", e)))?;

    tracing::info!(
        log_file = %Config::log_path().display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Filter directive that raises only the editpulse crates to `level`.
fn filter_directive(level: &str) -> String {
    format!("warn,editpulse_core={level},editpulse={level}")
}

/// Initialize logging for tests (logs to stdout)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_scopes_level_to_editpulse() {
        assert_eq!(
            filter_directive("debug"),
            "warn,editpulse_core=debug,editpulse=debug"
        );
        assert!(EnvFilter::try_new(filter_directive("trace")).is_ok());
    }

    #[test]
    fn test_log_file_lives_in_state_dir() {
        assert_eq!(Config::state_dir().join(LOG_FILE_NAME), Config::log_path());
    }
}
