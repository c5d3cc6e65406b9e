//! Error types for ieod-dl
//!
//! This module provides the error hierarchy used across the pipeline:
//! - Transport failures (connection errors, non-success HTTP status)
//! - Listing markup that could not be interpreted
//! - Archive failures (invalid archive, no qualifying inner file)
//! - Local filesystem failures
//!
//! Every error maps onto a coarse [`ErrorKind`] so per-task failures can be reported
//! through events without carrying the full error value.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ieod-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ieod-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "portal.base_url")
        key: Option<String>,
    },

    /// Connection-level transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The status code returned by the portal
        status: u16,
    },

    /// Listing markup could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Archive-related error
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL built from configuration
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation cancelled through the batch cancellation token
    #[error("operation cancelled")]
    Cancelled,

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Archive-related errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Downloaded payload is not a structurally valid archive
    #[error("{} is not a valid archive: {reason}", .path.display())]
    InvalidArchive {
        /// The downloaded file
        path: PathBuf,
        /// The reason the archive was rejected
        reason: String,
    },

    /// Archive holds no entry with the expected extension
    #[error("{} contains no {extension} entry", .path.display())]
    NoQualifyingEntry {
        /// The archive that was inspected
        path: PathBuf,
        /// The extension that was looked for
        extension: String,
    },

    /// Reading an entry out of the archive failed
    #[error("failed to read entry from {}: {reason}", .path.display())]
    EntryReadFailed {
        /// The archive being read
        path: PathBuf,
        /// The reason reading failed
        reason: String,
    },
}

/// Coarse failure category, stable across error variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection failure or non-success status
    Transport,
    /// Unexpected listing markup
    Parse,
    /// Invalid archive or missing inner file
    Archive,
    /// Local filesystem failure
    Io,
    /// Invalid configuration
    Config,
    /// Cancelled before completion
    Cancelled,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Machine-readable code for logs and events
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport_error",
            ErrorKind::Parse => "parse_error",
            ErrorKind::Archive => "archive_error",
            ErrorKind::Io => "io_error",
            ErrorKind::Config => "config_error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Other => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::HttpStatus { .. } => ErrorKind::Transport,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Archive(_) => ErrorKind::Archive,
            Error::Io(_) => ErrorKind::Io,
            Error::Config { .. } | Error::Url(_) => ErrorKind::Config,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Serialization(_) | Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Build a configuration error for the given key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
