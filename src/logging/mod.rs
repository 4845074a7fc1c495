//! Tracing subscriber initialization.
//!
//! The terminal belongs to the timeline viewer, so logs go to a file.
//! Follow them with `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{MakeWriter, SubscriberBuilder};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Log path has no usable file name
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Install the global subscriber, appending to `log_path`.
///
/// Respects `RUST_LOG`, defaulting to [`DEFAULT_FILTER`]. Creates the log
/// directory if needed.
///
/// # Errors
///
/// Fails if the directory cannot be created, the path has no file name, or a
/// global subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);

    subscriber_builder(appender, env_filter())
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

/// `RUST_LOG` filter, or [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Plain-text formatter writing to `writer`.
fn subscriber_builder<W>(writer: W, filter: EnvFilter) -> SubscriberBuilder<DefaultFields, Format, EnvFilter, W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
}

/// Directory and file name of a log path. A bare file name logs to `.`.
fn split_log_path(log_path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, file_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn split_log_path_separates_directory_and_file() {
        let (dir, name) = split_log_path(Path::new("/var/log/chronicle/chronicle.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/chronicle"));
        assert_eq!(name, "chronicle.log");
    }

    #[test]
    fn split_log_path_defaults_bare_names_to_current_dir() {
        let (dir, name) = split_log_path(Path::new("chronicle.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "chronicle.log");
    }

    #[test]
    fn split_log_path_rejects_paths_without_file_name() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    fn formatter_writes_plain_text_at_info() {
        let dir = TempDir::new().unwrap();
        let appender = tracing_appender::rolling::never(dir.path(), "test.log");
        let subscriber = subscriber_builder(appender, EnvFilter::new("info")).finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(books = 3, "Library loaded");
            tracing::debug!("hidden detail");
        });

        let contents = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert!(contents.contains("Library loaded"), "{contents}");
        assert!(contents.contains("books=3"), "{contents}");
        assert!(!contents.contains("hidden detail"), "{contents}");
        assert!(!contents.contains('\u{1b}'), "log file must not contain ANSI escapes");
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let log_file = log_dir.join("chronicle.log");

        // May fail with SubscriberAlreadySet; the directory is created first.
        let _ = init(&log_file);

        assert!(log_dir.exists(), "Log directory should be created: {:?}", log_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("chronicle.log");

        let _ = init(&log_file);

        assert!(matches!(
            init(&log_file),
            Err(LoggingError::SubscriberAlreadySet)
        ));
    }
}
