//! Schema registry
//!
//! The registry is the controller callers construct once and pass to
//! whatever needs schema access. It builds object schemas, binds a schema
//! plus options to a [`SchemaStore`], and owns the reference to the store
//! connection that every store it built reads through.
//!
//! ## Lifecycle
//!
//! ```text
//! attach_client(conn) -> on_initialize() -> ...operations... -> on_before_exit()
//! ```
//!
//! Stores may be defined before a connection is attached; their operations
//! wait at the readiness gate until `on_initialize` (or whoever owns the
//! connection) has connected it.

use crate::config::RegistryConfig;
use schemastore_core::{
    derive_namespace, validate_namespace, Error, NamespaceOptions, ObjectSchema, Result, Schema,
};
use schemastore_engine::{ConnectionSlot, SchemaStore, StoreConnection, StoreOptions, StoreSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Caller-supplied schema options
///
/// Unset fields take defaults: no expiry, `read_once = false`, namespace
/// derived from the schema and the other options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Expiry in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Delete after first read
    #[serde(rename = "readOnce", skip_serializing_if = "Option::is_none")]
    pub read_once: Option<bool>,
    /// Explicit namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl SchemaOptions {
    /// Set the expiry in seconds
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Set read-once consumption
    pub fn read_once(mut self, read_once: bool) -> Self {
        self.read_once = Some(read_once);
        self
    }

    /// Use an explicit namespace instead of a derived one
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Builds schemas and schema stores over one shared connection
#[derive(Debug)]
pub struct SchemaRegistry {
    slot: ConnectionSlot,
    config: RegistryConfig,
    settings: StoreSettings,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            slot: ConnectionSlot::new(),
            config: RegistryConfig::default(),
            settings: StoreSettings::default(),
        }
    }
}

impl SchemaRegistry {
    /// Create a registry from validated configuration
    pub fn new(config: RegistryConfig) -> Result<Self> {
        Ok(Self {
            slot: ConnectionSlot::new(),
            settings: config.store_settings()?,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ========== Schemas ==========

    /// Compose named child schemas into an object schema, keeping order
    pub fn define_template<I, N>(&self, fields: I) -> Result<ObjectSchema>
    where
        I: IntoIterator<Item = (N, Schema)>,
        N: Into<String>,
    {
        let template = ObjectSchema::new(fields);
        Schema::Object(template.clone()).check()?;
        Ok(template)
    }

    /// Bind a schema and options to a new store
    ///
    /// The namespace is the explicit one if given, otherwise derived from the
    /// schema description, `ttl` and `read_once`.
    pub fn define_schema(
        &self,
        template: impl Into<Schema>,
        options: SchemaOptions,
    ) -> Result<SchemaStore> {
        let schema = template.into();
        schema.check()?;

        if options.ttl == Some(0) {
            return Err(Error::Config {
                reason: "ttl must be a positive number of seconds".to_string(),
            });
        }

        let ns_options = NamespaceOptions {
            ttl: options.ttl,
            read_once: options.read_once.unwrap_or(false),
        };
        let namespace = match options.namespace {
            Some(explicit) => {
                validate_namespace(&explicit)?;
                explicit
            }
            None => derive_namespace(&schema.describe(), &ns_options)?,
        };

        debug!(
            target: "schemastore::registry",
            namespace = %namespace,
            ttl = ?ns_options.ttl,
            read_once = ns_options.read_once,
            "Schema store defined"
        );

        Ok(SchemaStore::new(
            schema,
            StoreOptions {
                ttl: ns_options.ttl,
                read_once: ns_options.read_once,
                namespace,
            },
            self.slot.clone(),
            self.settings.clone(),
        ))
    }

    // ========== Connection ==========

    /// Bind the store connection used by every store from this registry
    pub fn attach_client(&self, connection: Arc<dyn StoreConnection>) {
        if self.slot.attach(connection).is_some() {
            warn!(target: "schemastore::registry", "Replaced previously attached store connection");
        } else {
            debug!(target: "schemastore::registry", "Store connection attached");
        }
    }

    /// Release the store connection reference
    pub fn destroy_client(&self) -> Option<Arc<dyn StoreConnection>> {
        let released = self.slot.detach();
        if released.is_some() {
            debug!(target: "schemastore::registry", "Store connection released");
        }
        released
    }

    /// True if a connection is attached
    pub fn is_attached(&self) -> bool {
        self.slot.is_attached()
    }

    /// True if a connection is attached and ready
    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    // ========== Host lifecycle ==========

    /// Connect the attached store connection
    pub async fn on_initialize(&self) -> Result<()> {
        let connection = self.slot.current().ok_or(Error::NotAttached)?;
        connection.connect().await?;
        info!(target: "schemastore::registry", "Store connection established");
        Ok(())
    }

    /// Disconnect and release the store connection
    pub async fn on_before_exit(&self) -> Result<()> {
        if let Some(connection) = self.destroy_client() {
            connection.disconnect().await?;
            info!(target: "schemastore::registry", "Store connection closed");
        }
        Ok(())
    }
}
