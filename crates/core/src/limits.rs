//! Size limits for keys and wire payloads
//!
//! Limits are enforced by the store on every write. Violations result in
//! `ConstraintViolation` errors carrying a reason code.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits for keys and payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum full key length in bytes, namespace included (default: 1024)
    pub max_key_bytes: usize,

    /// Maximum encoded wire payload in bytes (default: 16MB)
    pub max_payload_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_bytes: 1024,
            max_payload_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl Limits {
    /// Check a full store key against the limit
    pub fn check_key(&self, full_key: &str) -> Result<(), LimitError> {
        let len = full_key.len();
        if len > self.max_key_bytes {
            return Err(LimitError::KeyTooLong {
                actual: len,
                max: self.max_key_bytes,
            });
        }
        Ok(())
    }

    /// Check an encoded payload against the limit
    pub fn check_payload(&self, wire: &str) -> Result<(), LimitError> {
        let len = wire.len();
        if len > self.max_payload_bytes {
            return Err(LimitError::PayloadTooLarge {
                actual: len,
                max: self.max_payload_bytes,
            });
        }
        Ok(())
    }
}

/// Limit violation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Key exceeds maximum length
    #[error("key too long: {actual} bytes exceeds maximum {max}")]
    KeyTooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Payload exceeds maximum size
    #[error("payload too large: {actual} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual size in bytes
        actual: usize,
        /// Maximum allowed size
        max: usize,
    },
}

impl LimitError {
    /// Reason code for structured logging
    pub fn reason_code(&self) -> &'static str {
        match self {
            LimitError::KeyTooLong { .. } => "key_too_long",
            LimitError::PayloadTooLarge { .. } => "payload_too_large",
        }
    }
}

impl From<LimitError> for Error {
    fn from(e: LimitError) -> Self {
        Error::ConstraintViolation {
            reason: format!("{} ({})", e, e.reason_code()),
        }
    }
}
