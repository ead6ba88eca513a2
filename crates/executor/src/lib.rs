//! # Schemastore Executor
//!
//! The public API for schemastore: schema-typed, namespace-isolated records
//! over an external key-value store.
//!
//! This is the only crate users need to import. It provides:
//! - [`SchemaRegistry`] - builds schemas and binds them to stores
//! - [`SchemaStore`] - set/get/delete/with/random-key operations
//! - [`RegistryConfig`] - `schemastore.toml` configuration
//!
//! ## Quick Start
//!
//! ```text
//! use schemastore_executor::{MemoryConnection, Schema, SchemaOptions, SchemaRegistry};
//!
//! let registry = SchemaRegistry::default();
//! let sessions = registry.define_schema(
//!     registry.define_template([
//!         ("userId", Schema::string()),
//!         ("userName", Schema::nullable(Schema::string())),
//!     ])?,
//!     SchemaOptions::default().ttl(3600),
//! )?;
//!
//! registry.attach_client(Arc::new(MemoryConnection::new()));
//! registry.on_initialize().await?;
//!
//! let key = sessions.random_key().set(&json!({"userId": "42", "userName": null})).await?;
//! let session = sessions.get(&key).await?;
//! ```
//!
//! ## Wire format
//!
//! Object values are stored as positional arrays in field declaration order
//! (`["42", null]`), at `"<namespace>+<key>"`.

#![warn(missing_docs)]

mod config;
mod registry;

pub use config::{RegistryConfig, CONFIG_FILE_NAME};
pub use registry::{SchemaOptions, SchemaRegistry};

// Re-export what users need so they don't import the inner crates directly
pub use schemastore_core::{
    Decoded, Error, Limits, ObjectSchema, PrimitiveType, Result, Schema, SchemaDescription,
    ValidationError, Value,
};
pub use schemastore_engine::{
    ConnectionSlot, MemoryConnection, RandomKey, ReadinessConfig, SchemaStore, StoreConnection,
    StoreOptions,
};

/// Codec and key functions for callers working with wire text directly
pub mod codec {
    pub use schemastore_core::codec::{decode, decode_bytes, encode, encode_to_wire};
    pub use schemastore_core::key::{
        derive_namespace, full_key, generate_random_key, NamespaceOptions, KEY_SEPARATOR,
    };
}
