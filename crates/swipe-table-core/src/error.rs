//! Error types for swipe-table.
//!
//! Swiping itself never fails: vetoes are policy decisions and malformed
//! settings are clamped. Errors only surface at the edges, when swipe
//! configuration is loaded from text or files.

use std::path::PathBuf;

/// Result type alias for swipe-table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating swipe configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration text could not be parsed.
    #[error("Failed to parse {format} configuration: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("Unsupported configuration format for '{path}' (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// A configuration value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl Error {
    /// Create a parse error.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
