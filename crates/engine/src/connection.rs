//! Store connection seam
//!
//! The store connection (transport, protocol, connect/disconnect) is owned
//! outside this crate. [`StoreConnection`] is the surface the schema stores
//! consume; [`ConnectionSlot`] is the shared, swappable reference every store
//! built by one registry reads through, so a connection attached after the
//! stores were defined is still picked up.

use async_trait::async_trait;
use parking_lot::RwLock;
use schemastore_core::Result;
use std::fmt;
use std::sync::Arc;

/// Primitive key-value operations a backing store must provide
///
/// Values are opaque wire text. Implementations report transport failures
/// as `Error::Connection`.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Establish the connection; `is_ready` turns true once this completes
    async fn connect(&self) -> Result<()>;

    /// Tear the connection down
    async fn disconnect(&self) -> Result<()>;

    /// True once the connection can serve operations
    fn is_ready(&self) -> bool;

    /// Write without expiry
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write with expiry after `seconds`
    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()>;

    /// Read raw bytes, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove a key, returning the number of keys removed
    async fn delete(&self, key: &str) -> Result<u64>;
}

/// Shared, swappable connection reference
///
/// Cloning shares the slot. The lock is only held to clone the `Arc` out,
/// never across an await point.
#[derive(Clone, Default)]
pub struct ConnectionSlot {
    inner: Arc<RwLock<Option<Arc<dyn StoreConnection>>>>,
}

impl ConnectionSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection, returning the one it replaced
    pub fn attach(&self, connection: Arc<dyn StoreConnection>) -> Option<Arc<dyn StoreConnection>> {
        self.inner.write().replace(connection)
    }

    /// Release the attached connection
    pub fn detach(&self) -> Option<Arc<dyn StoreConnection>> {
        self.inner.write().take()
    }

    /// The attached connection, if any
    pub fn current(&self) -> Option<Arc<dyn StoreConnection>> {
        self.inner.read().clone()
    }

    /// True if a connection is attached
    pub fn is_attached(&self) -> bool {
        self.inner.read().is_some()
    }

    /// True if a connection is attached and ready
    pub fn is_ready(&self) -> bool {
        self.inner
            .read()
            .as_ref()
            .map(|c| c.is_ready())
            .unwrap_or(false)
    }
}

impl fmt::Debug for ConnectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSlot")
            .field("attached", &self.is_attached())
            .field("ready", &self.is_ready())
            .finish()
    }
}
