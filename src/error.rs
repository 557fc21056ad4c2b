//! Centralized error handling for docexport
//!
//! This module provides a unified error type that covers all error scenarios
//! in the export engine: format selection, filename validation, clipboard and
//! save-mechanism availability, PDF rendering, file I/O, and configuration.

use crate::export::clipboard::ClipboardError;
use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the export engine.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the export engine.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Contract Violations
    // ─────────────────────────────────────────────────────────────────────────
    /// The requested export format is not one of the supported formats
    UnsupportedFormat(String),

    /// The base filename cannot produce a valid file name
    InvalidFilename { name: String, reason: &'static str },

    // ─────────────────────────────────────────────────────────────────────────
    // Environment Unavailability
    // ─────────────────────────────────────────────────────────────────────────
    /// The system clipboard could not be opened or written
    ClipboardUnavailable(ClipboardError),

    /// The platform save mechanism is missing or denied
    DeliveryUnavailable {
        reason: String,
        source: Option<io::Error>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Encoding and File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The PDF writer failed to produce a document
    Render(String),

    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

impl Error {
    /// Shorthand for a `DeliveryUnavailable` error without an underlying cause.
    pub fn delivery_unavailable(reason: impl Into<String>) -> Self {
        Error::DeliveryUnavailable {
            reason: reason.into(),
            source: None,
        }
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ClipboardError> for Error {
    fn from(err: ClipboardError) -> Self {
        Error::ClipboardUnavailable(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Contract Violations
            Error::UnsupportedFormat(name) => {
                write!(f, "Unsupported export format '{}'", name)
            }
            Error::InvalidFilename { name, reason } => {
                write!(f, "Invalid file name '{}': {}", name, reason)
            }

            // Environment Unavailability
            Error::ClipboardUnavailable(err) => write!(f, "Clipboard unavailable: {}", err),
            Error::DeliveryUnavailable { reason, source } => match source {
                Some(source) => write!(f, "Save unavailable: {} ({})", reason, source),
                None => write!(f, "Save unavailable: {}", reason),
            },

            // Encoding and File I/O Errors
            Error::Render(msg) => write!(f, "PDF rendering failed: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ClipboardUnavailable(err) => Some(err),
            Error::DeliveryUnavailable { source, .. } => source
                .as_ref()
                .map(|s| s as &(dyn std::error::Error + 'static)),
            Error::Io(err) => Some(err),
            Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::UnsupportedFormat(_)
            | Error::InvalidFilename { .. }
            | Error::Render(_)
            | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
