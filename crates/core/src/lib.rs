//! Core types for schemastore
//!
//! This crate defines everything that does not touch a store connection:
//! - Schema: tagged shape description (primitive | nullable | array | object)
//! - Validation: value checking with per-path errors
//! - Codec: positional-array encoding and validating decode
//! - Key: namespace derivation, full key composition, random keys
//! - Limits: key and payload size limits
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod key;
pub mod limits;
pub mod schema;
pub mod validate;

pub use codec::{decode, decode_bytes, encode, encode_to_wire, Decoded};
pub use error::{Error, Result};
pub use key::{
    derive_namespace, full_key, generate_random_key, validate_namespace, NamespaceError,
    NamespaceOptions, DEFAULT_RANDOM_KEY_BYTES, KEY_SEPARATOR,
};
pub use limits::{LimitError, Limits};
pub use schema::{Field, FieldDescription, ObjectSchema, PrimitiveType, Schema, SchemaDescription};
pub use validate::{is_valid, validate, ValidationError};

/// Values stored through schemastore
pub use serde_json::Value;
