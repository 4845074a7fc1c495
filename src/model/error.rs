//! Error types for chronicle.
//!
//! Each concern owns a `thiserror` enum; [`AppError`] unifies them so the
//! binary composes with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned to `main`
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing setup failures
//!   - [`LibraryError`] - library file persistence failures
//!   - [`ImportError`] - CSV export file could not be read at all
//!   - [`TuiError`](crate::view::TuiError) - terminal failures
//!
//! # Recovery Strategy
//!
//! Collaborator failures (classification service, bibliographic lookup) never
//! reach this hierarchy: they are logged and turned into "no result" at their
//! boundary. Malformed classifier output is absorbed by the response parser.
//! Only local I/O the reader has to act on (an unwritable library file, a
//! missing CSV) surfaces as an error.

use crate::model::BookId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The library file could not be read or written.
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    /// A CSV export could not be imported.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Terminal UI failure.
    #[error("Terminal error: {0}")]
    Tui(#[from] crate::view::TuiError),
}

/// Failures of the library repository.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Reading the library file failed for a reason other than absence.
    #[error("Failed to read library at {path}: {source}")]
    Read {
        /// Library file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the library file failed.
    #[error("Failed to write library at {path}: {source}")]
    Write {
        /// Library file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing the collection failed.
    #[error("Failed to encode library: {0}")]
    Encode(#[from] serde_json::Error),

    /// No book with the given id exists.
    #[error("No book with id {0}")]
    NotFound(BookId),
}

/// Failures reading a CSV export.
///
/// Individual bad rows are skipped, not reported here.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The export file could not be opened.
    #[error("Failed to read export file {path}: {source}")]
    Read {
        /// Export file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The header row could not be parsed.
    #[error("Invalid CSV header: {0}")]
    Header(#[source] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_error_converts_into_app_error() {
        let err = LibraryError::NotFound(BookId::new("missing").unwrap());
        let app: AppError = err.into();
        assert!(matches!(app, AppError::Library(_)));
        assert!(app.to_string().contains("missing"));
    }

    #[test]
    fn read_error_names_path() {
        let err = ImportError::Read {
            path: PathBuf::from("/tmp/export.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/export.csv"));
    }
}
