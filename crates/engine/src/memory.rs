//! In-process store connection
//!
//! `MemoryConnection` implements [`StoreConnection`] over a `DashMap` with
//! per-entry expiry deadlines. Expired entries are dropped on access, and
//! every [`SWEEP_INTERVAL`] writes a sweep removes the ones nobody touched.
//! Deadlines use `tokio::time::Instant`, so tests running on a paused clock
//! can step through expiry deterministically.

use crate::connection::StoreConnection;
use async_trait::async_trait;
use dashmap::DashMap;
use schemastore_core::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Writes between sweeps of expired entries
pub const SWEEP_INTERVAL: u64 = 256;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

/// In-memory key-value store with expiry
#[derive(Debug, Default)]
pub struct MemoryConnection {
    entries: DashMap<String, Entry>,
    ready: AtomicBool,
    connect_delay: Option<Duration>,
    writes: AtomicU64,
}

impl MemoryConnection {
    /// Create a connection that becomes ready on `connect()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connection that is ready immediately
    pub fn connected() -> Self {
        let conn = Self::new();
        conn.ready.store(true, Ordering::Release);
        conn
    }

    /// Simulate connection establishment latency
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// True if no live entries remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write raw bytes directly, bypassing any codec
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    /// Keys of all live entries
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| !e.is_expired(now))
            .map(|e| e.key().clone())
            .collect()
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(target: "schemastore::memory", purged, "Purged expired entries");
        }
        purged
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::connection("memory connection is not connected"))
        }
    }

    fn put(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.as_bytes().to_vec(),
                expires_at,
            },
        );
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % SWEEP_INTERVAL == 0 {
            self.purge_expired();
        }
    }
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn connect(&self) -> Result<()> {
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        self.ready.store(true, Ordering::Release);
        debug!(target: "schemastore::memory", "Memory connection ready");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.ready.store(false, Ordering::Release);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_ready()?;
        self.put(key, value, None);
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        self.ensure_ready()?;
        self.put(key, value, Some(Instant::now() + Duration::from_secs(seconds)));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_ready()?;
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired(now) => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
        };
        if expired {
            self.entries.remove_if(key, |_, e| e.is_expired(now));
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.ensure_ready()?;
        let now = Instant::now();
        match self.entries.remove(key) {
            Some((_, entry)) if !entry.is_expired(now) => Ok(1),
            _ => Ok(0),
        }
    }
}
