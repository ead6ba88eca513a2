//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
pub use schemastore::{
    Error, MemoryConnection, ObjectSchema, ReadinessConfig, RegistryConfig, Result, Schema,
    SchemaOptions, SchemaRegistry, SchemaStore, StoreConnection, Value,
};
pub use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
pub use std::sync::Arc;
use std::sync::Once;
pub use std::time::Duration;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Schemas
// ============================================================================

/// `object{ userId: string, userName: nullable(string) }`
pub fn user_fields() -> Vec<(&'static str, Schema)> {
    vec![
        ("userId", Schema::string()),
        ("userName", Schema::nullable(Schema::string())),
    ]
}

/// `object{ profile: user, active: boolean }`
pub fn account_fields(registry: &SchemaRegistry) -> Vec<(&'static str, Schema)> {
    let profile = registry.define_template(user_fields()).expect("user template");
    vec![("profile", profile.into()), ("active", Schema::boolean())]
}

// ============================================================================
// Registries
// ============================================================================

/// Registry with a connected in-memory store attached.
pub fn connected_registry() -> (SchemaRegistry, Arc<MemoryConnection>) {
    init_tracing();
    let registry = SchemaRegistry::default();
    let conn = Arc::new(MemoryConnection::connected());
    registry.attach_client(conn.clone());
    (registry, conn)
}

/// Registry whose readiness gate gives up quickly.
pub fn fast_gate_registry(max_attempts: u32) -> SchemaRegistry {
    init_tracing();
    SchemaRegistry::new(RegistryConfig {
        readiness: ReadinessConfig {
            poll_interval_ms: 100,
            max_attempts,
        },
        ..RegistryConfig::default()
    })
    .expect("valid config")
}

// ============================================================================
// Connection doubles
// ============================================================================

/// Wraps a `MemoryConnection`, counting calls and optionally failing deletes.
pub struct RecordingConnection {
    pub inner: MemoryConnection,
    pub fail_deletes: AtomicBool,
    pub gets: AtomicU64,
    pub deletes: AtomicU64,
}

impl RecordingConnection {
    pub fn connected() -> Self {
        Self {
            inner: MemoryConnection::connected(),
            fail_deletes: AtomicBool::new(false),
            gets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
        }
    }

    pub fn gets(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnection for RecordingConnection {
    async fn connect(&self) -> Result<()> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        self.inner.disconnect().await
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        self.inner.set_with_expiry(key, value, seconds).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::connection("delete refused"));
        }
        self.inner.delete(key).await
    }
}
