//! Error types for the gridcore engine and viewer.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the viewer binary
//!   - [`GridError`] - Grid configuration failures (bad `sort_by` / `sort_order`)
//!   - [`InputError`] - Row file reading and decoding failures
//!   - [`ConfigError`](crate::config::ConfigError) - Settings file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!   - [`TuiError`](crate::view::TuiError) and `std::io::Error` - Terminal failures
//!
//! # Error Recovery Strategy
//!
//! Configuration errors are **fatal** and surface immediately to the caller;
//! nothing is retried. Missing measurements (a row or column that has not been
//! rendered yet) are never errors: the engines substitute a fallback estimate
//! and log at `trace` level. Unparsable sort values are not errors either; they
//! fall through the comparator's classification.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes of the viewer.
///
/// All domain-specific error types convert to `AppError` via `From`, enabling
/// propagation with `?` from `main`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The grid configuration was rejected.
    #[error("Invalid grid configuration: {0}")]
    Grid(#[from] GridError),

    /// Failed to read or decode the row data.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Failed to load the settings file.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Failed to initialise logging.
    #[error("Failed to initialise logging: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// **Recovery**: Attempt graceful terminal cleanup, then exit.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The viewer's event loop failed.
    #[error("Viewer error: {0}")]
    Tui(#[from] crate::view::TuiError),
}

/// Errors raised while configuring a grid.
///
/// These are configuration-time failures: the caller supplied a value the grid
/// cannot honour. They are returned immediately and never retried.
///
/// # Examples
///
/// ```
/// use gridcore::model::error::GridError;
///
/// let err = GridError::InvalidConfiguration {
///     field: "sort_by",
///     reason: "must be a valid column name (got \"missing\")".to_string(),
/// };
/// assert!(err.to_string().contains("sort_by"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A configuration field holds a value the grid cannot use.
    #[error("[{field}] {reason}")]
    InvalidConfiguration {
        /// Name of the rejected configuration field (`sort_by`, `sort_order`, ...).
        field: &'static str,
        /// Human readable explanation including the offending value.
        reason: String,
    },
}

impl GridError {
    /// Shorthand for [`GridError::InvalidConfiguration`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors encountered when loading row or column files for the viewer.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use gridcore::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json"),
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The row file is not a JSON array of records.
    #[error("Invalid row data in {path}: {message}")]
    InvalidRows {
        /// File that failed to decode.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The column file is not a valid TOML column set.
    #[error("Invalid column definitions in {path}: {message}")]
    InvalidColumns {
        /// File that failed to decode.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// Generic I/O error reading from the input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_display_names_field_and_reason() {
        let err = GridError::invalid("sort_order", "must be empty, ASC or DESC (got \"up\")");
        assert_eq!(
            err.to_string(),
            "[sort_order] must be empty, ASC or DESC (got \"up\")"
        );
    }

    #[test]
    fn grid_error_converts_into_app_error() {
        fn configure() -> Result<(), AppError> {
            Err(GridError::invalid("sort_by", "unknown column"))?;
            Ok(())
        }

        let err = configure().unwrap_err();
        assert!(matches!(err, AppError::Grid(_)));
        assert!(err.to_string().contains("unknown column"));
    }

    #[test]
    fn io_error_converts_into_input_error() {
        fn open() -> Result<(), InputError> {
            Err(std::io::Error::other("disk gone"))?;
            Ok(())
        }

        let err = open().unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }

    #[test]
    fn invalid_rows_message_includes_path() {
        let err = InputError::InvalidRows {
            path: PathBuf::from("rows.json"),
            message: "expected `[`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("rows.json"));
        assert!(msg.contains("expected `[`"));
    }
}
