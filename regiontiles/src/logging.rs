//! Logging infrastructure for RegionTiles.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `<directory>/<file>` (cleared on session start)
//! - Also prints to stderr, keeping stdout free for rendered tiles
//! - Configurable via the `RUST_LOG` environment variable, falling back to
//!   the configured filter

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory or file could not be prepared.
    #[error("Failed to prepare log file: {0}")]
    Io(#[from] io::Error),

    /// The filter directive did not parse.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Filter from `RUST_LOG`, or `default_filter` when it is unset.
fn env_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter).map_err(|e| LoggingError::InvalidFilter {
        filter: default_filter.to_string(),
        reason: e.to_string(),
    })
}

/// Initialize logging.
///
/// Creates the log directory if needed, clears the previous log file, and
/// installs a global subscriber writing to both the file and stderr.
///
/// # Returns
///
/// LoggingGuard that must be kept alive for logging to work
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, LoggingError> {
    let filter = env_filter(&settings.filter)?;

    fs::create_dir_all(&settings.directory)?;
    let log_path = Path::new(&settings.directory).join(&settings.file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(&settings.directory, &settings.file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Get the default log directory path.
pub fn default_log_dir() -> &'static str {
    crate::config::DEFAULT_LOG_DIRECTORY
}

/// Get the default log file name.
pub fn default_log_file() -> &'static str {
    crate::config::DEFAULT_LOG_FILE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_log_dir() {
        assert_eq!(default_log_dir(), "logs");
    }

    #[test]
    fn test_default_log_file() {
        assert_eq!(default_log_file(), "regiontiles.log");
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = LoggingError::InvalidFilter {
            filter: "loud".to_string(),
            reason: "invalid level".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid log filter 'loud': invalid level");
    }

    #[test]
    fn test_init_logging_creates_empty_log_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let directory = temp_dir.path().join("logs");
        let log_path = directory.join("test.log");
        fs::create_dir_all(&directory).unwrap();
        fs::write(&log_path, "stale contents").unwrap();

        let settings = LoggingSettings {
            directory: PathBuf::from(&directory),
            file: "test.log".to_string(),
            filter: "info".to_string(),
        };

        // Another test binary may already own the global subscriber; the
        // file is prepared either way.
        let _guard = init_logging(&settings);

        assert!(log_path.exists());
        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(!contents.contains("stale contents"));
    }
}
