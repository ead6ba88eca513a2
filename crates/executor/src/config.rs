//! Registry configuration via `schemastore.toml`
//!
//! Every field is optional; a missing file or an empty file yields the
//! defaults (100ms x 300 readiness polling, 16-byte random keys, 1KB keys,
//! 16MB payloads).

use schemastore_core::{Error, Limits, Result, DEFAULT_RANDOM_KEY_BYTES};
use schemastore_engine::{ReadinessConfig, ReadinessGate, StoreSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up in a configuration directory.
pub const CONFIG_FILE_NAME: &str = "schemastore.toml";

/// Registry configuration loaded from `schemastore.toml`.
///
/// # Example
///
/// ```toml
/// random_key_bytes = 16
///
/// [readiness]
/// poll_interval_ms = 100
/// max_attempts = 300
///
/// [limits]
/// max_key_bytes = 1024
/// max_payload_bytes = 16777216
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Byte length behind keys generated by `random_key()`.
    pub random_key_bytes: usize,
    /// Readiness gate polling.
    pub readiness: ReadinessConfig,
    /// Key and payload limits.
    pub limits: Limits,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            random_key_bytes: DEFAULT_RANDOM_KEY_BYTES,
            readiness: ReadinessConfig::default(),
            limits: Limits::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `schemastore.toml` from `dir`, falling back to defaults if absent.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for zero poll interval, zero attempts, zero
    /// random key length, or zero limits.
    pub fn validate(&self) -> Result<()> {
        self.readiness.validate()?;
        if self.random_key_bytes == 0 {
            return Err(config_error("random_key_bytes must be greater than zero"));
        }
        if self.limits.max_key_bytes == 0 {
            return Err(config_error("limits.max_key_bytes must be greater than zero"));
        }
        if self.limits.max_payload_bytes == 0 {
            return Err(config_error("limits.max_payload_bytes must be greater than zero"));
        }
        Ok(())
    }

    /// Settings handed to every store the registry builds.
    ///
    /// Validates first, so a config built in code gets the same checks as
    /// one loaded from a file.
    pub fn store_settings(&self) -> Result<StoreSettings> {
        self.validate()?;
        Ok(StoreSettings {
            gate: ReadinessGate::new(self.readiness)?,
            limits: self.limits.clone(),
            random_key_bytes: self.random_key_bytes,
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# schemastore configuration
#
# Byte length of keys generated by random_key() (URL-safe encoded)
random_key_bytes = 16

# Readiness gate: operations wait up to poll_interval_ms * max_attempts
# for the store connection before failing
[readiness]
poll_interval_ms = 100
max_attempts = 300

[limits]
max_key_bytes = 1024
max_payload_bytes = 16777216
"#
    }
}

fn config_error(reason: &str) -> Error {
    Error::Config {
        reason: reason.to_string(),
    }
}
