//! Store access layer for schemastore
//!
//! - [`StoreConnection`]: the primitive key-value surface a backing store provides
//! - [`ConnectionSlot`]: shared, swappable reference to the attached connection
//! - [`MemoryConnection`]: in-process connection with expiry
//! - [`ReadinessGate`]: bounded wait for the connection to become ready
//! - [`SchemaStore`]: set/get/delete/with/random-key over one namespace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod memory;
pub mod readiness;
pub mod store;

pub use connection::{ConnectionSlot, StoreConnection};
pub use memory::MemoryConnection;
pub use readiness::{ReadinessConfig, ReadinessGate};
pub use store::{RandomKey, SchemaStore, StoreOptions, StoreSettings};
