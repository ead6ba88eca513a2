//! SchemaStore: schema-typed records in one namespace
//!
//! ## Design
//!
//! A `SchemaStore` is bound to one schema and one resolved set of options
//! for its whole lifetime. It holds no record state; every operation waits
//! on the [`ReadinessGate`], runs the value through the codec, then issues
//! a single primitive call on the attached [`StoreConnection`] at
//! `"<namespace>+<key>"`.
//!
//! ## Read semantics
//!
//! - Absent records read as `None`; [`SchemaStore::get_forced`] turns that
//!   into `Error::KeyNotFound`
//! - Records that decode but fail validation also read as `None`
//! - Parse and shape errors propagate
//!
//! ## readOnce
//!
//! With `read_once`, a successful read deletes the record right after the
//! read. The delete is a separate store call: its failure is logged and does
//! not affect the returned value, and two concurrent reads of the same
//! record can both observe it before either delete lands.
//!
//! ## Thread Safety
//!
//! `SchemaStore` is `Send + Sync` and cheap to clone.

use crate::connection::{ConnectionSlot, StoreConnection};
use crate::readiness::ReadinessGate;
use schemastore_core::{
    decode_bytes, encode_to_wire, full_key, generate_random_key, validate, Decoded, Error, Limits,
    Result, Schema, Value, DEFAULT_RANDOM_KEY_BYTES,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fully resolved, immutable store options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Expiry in seconds, `None` for no expiry
    pub ttl: Option<u64>,
    /// Delete records after their first read
    pub read_once: bool,
    /// Key prefix for every record of this store
    pub namespace: String,
}

/// Settings shared by every store a registry builds
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Gate run before every operation
    pub gate: ReadinessGate,
    /// Key and payload limits checked on write
    pub limits: Limits,
    /// Byte length of keys from [`SchemaStore::random_key`]
    pub random_key_bytes: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            gate: ReadinessGate::default(),
            limits: Limits::default(),
            random_key_bytes: DEFAULT_RANDOM_KEY_BYTES,
        }
    }
}

struct StoreInner {
    schema: Schema,
    options: StoreOptions,
    slot: ConnectionSlot,
    settings: StoreSettings,
}

/// Schema-typed record store bound to one namespace
///
/// # Example
///
/// ```ignore
/// let sessions = registry.define_schema(template, SchemaOptions::default().ttl(60))?;
///
/// sessions.set("abc", &json!({"userId": "42", "userName": null})).await?;
/// let value = sessions.get("abc").await?;
/// sessions.delete("abc").await?;
/// ```
#[derive(Clone)]
pub struct SchemaStore {
    inner: Arc<StoreInner>,
}

impl SchemaStore {
    /// Bind a schema and resolved options to a connection slot
    pub fn new(
        schema: Schema,
        options: StoreOptions,
        slot: ConnectionSlot,
        settings: StoreSettings,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                schema,
                options,
                slot,
                settings,
            }),
        }
    }

    /// The bound schema
    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// The resolved options
    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    /// The namespace prefix
    pub fn namespace(&self) -> &str {
        &self.inner.options.namespace
    }

    /// Full store key for a logical key
    pub fn full_key(&self, key: &str) -> String {
        full_key(&self.inner.options.namespace, key)
    }

    async fn connection(&self) -> Result<Arc<dyn StoreConnection>> {
        let slot = &self.inner.slot;
        self.inner.settings.gate.wait(|| slot.is_ready()).await?;
        slot.current().ok_or(Error::NotAttached)
    }

    // ========== Operations ==========

    /// Store `value` under `key`
    ///
    /// The value must satisfy the schema. Writes with the configured ttl, if
    /// any. Returns `key` unchanged.
    pub async fn set(&self, key: &str, value: &Value) -> Result<String> {
        let conn = self.connection().await?;

        let errors = validate(&self.inner.schema, value);
        if !errors.is_empty() {
            return Err(Error::Validation { errors });
        }

        let wire = encode_to_wire(&self.inner.schema, value)?;
        let storage_key = self.full_key(key);
        self.inner.settings.limits.check_key(&storage_key)?;
        self.inner.settings.limits.check_payload(&wire)?;

        match self.inner.options.ttl {
            Some(seconds) => conn.set_with_expiry(&storage_key, &wire, seconds).await?,
            None => conn.set(&storage_key, &wire).await?,
        }

        debug!(
            target: "schemastore::store",
            namespace = %self.namespace(),
            key,
            ttl = ?self.inner.options.ttl,
            bytes = wire.len(),
            "Record stored"
        );
        Ok(key.to_string())
    }

    /// Read the record at `key`
    ///
    /// Returns `None` when the record is absent or does not satisfy the
    /// schema.
    ///
    /// With `read_once`, the record is deleted after it is read and the
    /// delete is awaited before returning, so a later `get` from the same
    /// caller sees it gone. The delete's outcome never changes the result: a
    /// failed delete is logged and the decoded value is still returned. The
    /// delete is not atomic with the read, so two concurrent reads may both
    /// observe the record.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.connection().await?;
        let storage_key = self.full_key(key);

        let raw = match conn.get(&storage_key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let decoded = decode_bytes(&self.inner.schema, &raw);

        if self.inner.options.read_once {
            if let Err(e) = conn.delete(&storage_key).await {
                warn!(
                    target: "schemastore::store",
                    namespace = %self.namespace(),
                    key,
                    error = %e,
                    "readOnce delete failed"
                );
            }
        }

        match decoded? {
            Decoded::Valid(value) => Ok(Some(value)),
            Decoded::Invalid(errors) => {
                debug!(
                    target: "schemastore::store",
                    namespace = %self.namespace(),
                    key,
                    violations = errors.len(),
                    "Stored record failed validation, reading as absent"
                );
                Ok(None)
            }
        }
    }

    /// Read the record at `key`, failing with `KeyNotFound` if absent
    pub async fn get_forced(&self, key: &str) -> Result<Value> {
        self.get(key).await?.ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Remove the record at `key`, returning the store's removal count
    pub async fn delete(&self, key: &str) -> Result<u64> {
        let conn = self.connection().await?;
        let removed = conn.delete(&self.full_key(key)).await?;
        debug!(
            target: "schemastore::store",
            namespace = %self.namespace(),
            key,
            removed,
            "Record deleted"
        );
        Ok(removed)
    }

    /// Run `f` on the record at `key` if present
    ///
    /// Returns `None` without calling `f` when the record reads as absent.
    /// Whatever `f` returns, including its own errors, is passed through
    /// unchanged.
    pub async fn with<F, R>(&self, key: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(Value) -> R,
    {
        Ok(self.get(key).await?.map(f))
    }

    // ========== Typed helpers ==========

    /// Serialize `value` and store it under `key`
    pub async fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<String> {
        let value = serde_json::to_value(value)?;
        self.set(key, &value).await
    }

    /// Read the record at `key` and deserialize it
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // ========== Random keys ==========

    /// Writer that stores values under freshly generated keys
    pub fn random_key(&self) -> RandomKey<'_> {
        self.random_key_with_len(self.inner.settings.random_key_bytes)
    }

    /// Like [`random_key`](Self::random_key) with an explicit byte length
    pub fn random_key_with_len(&self, len: usize) -> RandomKey<'_> {
        RandomKey { store: self, len }
    }
}

impl std::fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaStore")
            .field("options", &self.inner.options)
            .field("schema", &self.inner.schema.kind())
            .finish()
    }
}

/// Stores values under random URL-safe keys
#[derive(Debug, Clone, Copy)]
pub struct RandomKey<'a> {
    store: &'a SchemaStore,
    len: usize,
}

impl RandomKey<'_> {
    /// Number of random bytes behind each key
    pub fn byte_len(&self) -> usize {
        self.len
    }

    /// Generate a key, store `value` under it and return the key
    pub async fn set(&self, value: &Value) -> Result<String> {
        let key = generate_random_key(self.len)?;
        self.store.set(&key, value).await
    }
}
