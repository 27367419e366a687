//! Unified error types for chatwrap.
//!
//! This module provides a single [`ChatwrapError`] enum that covers every
//! failure the library can report. Conditions that only degrade the report
//! (an unparsable transcript line, a contact card that cannot be read) are
//! logged through `tracing` instead of surfacing here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatwrap operations.
///
/// # Example
///
/// ```rust
/// use chatwrap::error::Result;
/// use chatwrap::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatwrapError>;

/// The error type for all chatwrap operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatwrapError {
    /// An I/O error occurred while writing output or reading auxiliary files.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript (or archive holding it) could not be read.
    #[error("Cannot read input file {}: {source}", path.display())]
    Input {
        /// Path that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The byte buffer is not a usable archive.
    ///
    /// Raised for a bad container signature, a truncated local header, or
    /// when no entry matches the requested extension.
    #[error("Invalid archive: {message}")]
    ArchiveFormat {
        /// Description of what's wrong
        message: String,
    },

    /// An archive entry uses a compression method other than stored or deflate.
    #[error("Unsupported compression method {method} for entry '{filename}'")]
    UnsupportedCompression {
        /// Name of the offending entry
        filename: String,
        /// Raw method id from the local header
        method: u16,
    },

    /// Inflating a deflate entry failed.
    #[error("Failed to decompress entry '{filename}': {source}")]
    Decompress {
        /// Name of the offending entry
        filename: String,
        /// The underlying I/O error from the inflater
        #[source]
        source: io::Error,
    },

    /// Invalid date format in configuration or CLI flags.
    ///
    /// Dates are expected in YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The configuration file could not be loaded or is inconsistent.
    #[error("Invalid configuration{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Config {
        /// The config file, if the problem came from one
        path: Option<PathBuf>,
        /// Description of what's wrong
        message: String,
    },

    /// A locale table could not be loaded.
    #[error("Invalid locale table: {message}")]
    Locale {
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl From<std::string::FromUtf8Error> for ChatwrapError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatwrapError::Utf8 {
            context: "transcript decoding".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatwrapError {
    /// Creates an input error for an unreadable transcript.
    pub fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatwrapError::Input {
            path: path.into(),
            source,
        }
    }

    /// Creates an archive format error.
    pub fn archive_format(message: impl Into<String>) -> Self {
        ChatwrapError::ArchiveFormat {
            message: message.into(),
        }
    }

    /// Creates an unsupported compression error.
    pub fn unsupported_compression(filename: impl Into<String>, method: u16) -> Self {
        ChatwrapError::UnsupportedCompression {
            filename: filename.into(),
            method,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatwrapError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a configuration error.
    pub fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        ChatwrapError::Config {
            path,
            message: message.into(),
        }
    }

    /// Creates a locale error.
    pub fn locale(message: impl Into<String>) -> Self {
        ChatwrapError::Locale {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatwrapError::Io(_))
    }

    /// Returns `true` if the transcript itself could not be read.
    pub fn is_input(&self) -> bool {
        matches!(self, ChatwrapError::Input { .. })
    }

    /// Returns `true` if this is an archive format error.
    pub fn is_archive_format(&self) -> bool {
        matches!(self, ChatwrapError::ArchiveFormat { .. })
    }

    /// Returns `true` if this error concerns a single archive entry.
    ///
    /// Such errors leave the rest of the archive readable.
    pub fn is_entry_error(&self) -> bool {
        matches!(
            self,
            ChatwrapError::UnsupportedCompression { .. } | ChatwrapError::Decompress { .. }
        )
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatwrapError::InvalidDate { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, ChatwrapError::Config { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
