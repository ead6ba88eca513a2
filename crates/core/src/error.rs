//! Error types for schemastore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | Surfaced to callers? |
//! |----------|----------|----------------------|
//! | Wire | `Parse`, `ShapeMismatch` | Always |
//! | Validation | `Validation` | On `set`; swallowed into `None` on reads |
//! | Not Found | `KeyNotFound` | Only on forced reads |
//! | Ordering | `NotReady`, `NotAttached` | Always, never retried |
//! | Input | `InvalidSchema`, `ConstraintViolation`, `Config` | Always |
//! | System | `Connection`, `Serialization`, `Io` | Always |

use crate::validate::ValidationError;
use std::io;
use thiserror::Error;

/// Result type alias for schemastore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schemastore
#[derive(Debug, Error)]
pub enum Error {
    /// Wire text is not valid JSON, or not an array where one is required
    #[error("parse error: {reason}")]
    Parse {
        /// What the parser rejected
        reason: String,
    },

    /// A value's structure does not line up with the schema's variant tags
    #[error("shape mismatch at '{path}': {reason}")]
    ShapeMismatch {
        /// Location of the offending element
        path: String,
        /// What was expected there
        reason: String,
    },

    /// A value does not satisfy its schema
    #[error("validation failed: {}", summarize(.errors))]
    Validation {
        /// Every violation found, in traversal order
        errors: Vec<ValidationError>,
    },

    /// A schema violates composition rules
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// Which rule was broken
        reason: String,
    },

    /// Forced read of a record that is absent
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The logical (unnamespaced) key
        key: String,
    },

    /// Readiness gate gave up waiting for the store connection
    #[error(
        "store connection not ready after {attempts} attempts every {interval_ms}ms; \
         the connection must be established before issuing operations"
    )]
    NotReady {
        /// Number of polls performed
        attempts: u32,
        /// Poll interval in milliseconds
        interval_ms: u64,
    },

    /// No store connection is attached to the registry
    #[error("no store connection attached")]
    NotAttached,

    /// Failure reported by the store connection
    #[error("connection error: {reason}")]
    Connection {
        /// Transport or protocol failure description
        reason: String,
    },

    /// Size or format constraint exceeded
    #[error("constraint violation: {reason}")]
    ConstraintViolation {
        /// Which constraint was exceeded
        reason: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("config error: {reason}")]
    Config {
        /// What was wrong with the configuration
        reason: String,
    },

    /// I/O error (config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a `Connection` error from any displayable failure
    pub fn connection(reason: impl std::fmt::Display) -> Self {
        Error::Connection {
            reason: reason.to_string(),
        }
    }

    /// Build a `ShapeMismatch` error
    pub fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ShapeMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors a read path reports as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config {
            reason: e.to_string(),
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
