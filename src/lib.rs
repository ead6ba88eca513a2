//! schemastore - schema-typed records over an external key-value store
//!
//! Values are validated against a declared schema, compressed into
//! positional arrays on the wire, and stored under a namespace derived from
//! the schema, so independent processes agree on key prefixes without
//! coordination.
//!
//! # Quick Start
//!
//! ```ignore
//! use schemastore::{MemoryConnection, Schema, SchemaOptions, SchemaRegistry};
//!
//! let registry = SchemaRegistry::default();
//! let users = registry.define_schema(
//!     registry.define_template([("userId", Schema::string())])?,
//!     SchemaOptions::default(),
//! )?;
//!
//! registry.attach_client(Arc::new(MemoryConnection::new()));
//! registry.on_initialize().await?;
//! users.set("42", &json!({"userId": "42"})).await?;
//! ```
//!
//! # Architecture
//!
//! All access goes through the [`SchemaRegistry`] and the [`SchemaStore`]s it
//! builds. The store connection is supplied by the caller through the
//! [`StoreConnection`] trait.

// Re-export the public API from schemastore-executor
pub use schemastore_executor::*;
