//! Namespaces and store keys
//!
//! Every record lives at `"<namespace>+<logicalKey>"`. The namespace is
//! either supplied by the caller or derived from the schema description and
//! options, so independent processes that define the same schema with the
//! same options land on the same prefix without coordination.
//!
//! ## Contract
//!
//! - The separator is the literal `+` and is never escaped
//! - Logical keys are opaque; they may contain the separator
//! - Namespaces must be non-empty and must not contain the separator, so a
//!   full key splits unambiguously at its first `+`
//! - Derived namespaces are `base64url(SHA-256(json([description, options])))`
//!   without padding (43 characters)

use crate::error::{Error, Result};
use crate::schema::SchemaDescription;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Separator between namespace and logical key
pub const KEY_SEPARATOR: char = '+';

/// Default number of random bytes behind a generated key
pub const DEFAULT_RANDOM_KEY_BYTES: usize = 16;

/// Options that participate in namespace derivation
///
/// Serialized as `{"ttl": .., "readOnce": ..}`; field order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamespaceOptions {
    /// Expiry in seconds, `None` for no expiry
    pub ttl: Option<u64>,
    /// Delete after first read
    #[serde(rename = "readOnce")]
    pub read_once: bool,
}

/// Compose a full store key
///
/// # Examples
///
/// ```
/// use schemastore_core::key::full_key;
///
/// assert_eq!(full_key("ns", "user:1"), "ns+user:1");
/// assert_eq!(full_key("ns", "a+b"), "ns+a+b");
/// ```
pub fn full_key(namespace: &str, key: &str) -> String {
    let mut out = String::with_capacity(namespace.len() + 1 + key.len());
    out.push_str(namespace);
    out.push(KEY_SEPARATOR);
    out.push_str(key);
    out
}

/// Derive a namespace from a schema description and options
///
/// Deterministic: identical inputs always yield the same namespace, and a
/// change to field names, field order, field types or options yields a
/// different one.
pub fn derive_namespace(description: &SchemaDescription, options: &NamespaceOptions) -> Result<String> {
    let canonical = serde_json::to_vec(&(description, options))?;
    let digest = Sha256::digest(&canonical);
    Ok(URL_SAFE_NO_PAD.encode(digest))
}

/// Generate a random URL-safe key from `len` bytes of OS randomness
pub fn generate_random_key(len: usize) -> Result<String> {
    if len == 0 {
        return Err(Error::ConstraintViolation {
            reason: "random key length must be at least one byte".to_string(),
        });
    }
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Validate an explicitly supplied namespace
///
/// # Examples
///
/// ```
/// use schemastore_core::key::validate_namespace;
///
/// assert!(validate_namespace("sessions").is_ok());
/// assert!(validate_namespace("").is_err());
/// assert!(validate_namespace("a+b").is_err());
/// ```
pub fn validate_namespace(namespace: &str) -> std::result::Result<(), NamespaceError> {
    if namespace.is_empty() {
        return Err(NamespaceError::Empty);
    }
    if namespace.contains(KEY_SEPARATOR) {
        return Err(NamespaceError::ContainsSeparator);
    }
    Ok(())
}

/// Namespace validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    /// Namespace is empty
    #[error("namespace cannot be empty")]
    Empty,

    /// Namespace contains the key separator
    #[error("namespace cannot contain the key separator '{}'", KEY_SEPARATOR)]
    ContainsSeparator,
}

impl From<NamespaceError> for Error {
    fn from(e: NamespaceError) -> Self {
        Error::Config {
            reason: e.to_string(),
        }
    }
}
