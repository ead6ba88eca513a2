//! Readiness gate
//!
//! Connection establishment runs outside this crate. Every store operation
//! first waits here until the store connection reports ready, polling on a
//! fixed interval up to a bounded number of attempts (100ms x 300 by
//! default, about 30 seconds).
//!
//! Running out of attempts is fatal and is not retried: it means operations
//! were issued before anything established the connection.

use schemastore_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Readiness polling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Delay between polls in milliseconds (default: 100)
    pub poll_interval_ms: u64,
    /// Polls before giving up (default: 300)
    pub max_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_attempts: 300,
        }
    }
}

impl ReadinessConfig {
    /// Reject zero interval or zero attempts
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config {
                reason: "readiness.poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(Error::Config {
                reason: "readiness.max_attempts must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Total time `wait` may take before failing
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms) * self.max_attempts
    }
}

/// Bounded wait for "store connection ready"
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    config: ReadinessConfig,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self {
            config: ReadinessConfig::default(),
        }
    }
}

impl ReadinessGate {
    /// Create a gate with the given polling configuration
    ///
    /// Fails with [`Error::Config`] on a zero interval or zero attempts.
    pub fn new(config: ReadinessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Polling configuration
    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Wait until `is_ready` holds
    ///
    /// Returns immediately if it already holds. Otherwise polls every
    /// `poll_interval_ms` and fails with [`Error::NotReady`] after
    /// `max_attempts` unsuccessful polls.
    pub async fn wait<F>(&self, is_ready: F) -> Result<()>
    where
        F: Fn() -> bool,
    {
        if is_ready() {
            return Ok(());
        }

        debug!(
            target: "schemastore::gate",
            interval_ms = self.config.poll_interval_ms,
            max_attempts = self.config.max_attempts,
            "Store connection not ready, waiting"
        );

        let mut ticker = interval(Duration::from_millis(self.config.poll_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        for attempt in 1..=self.config.max_attempts {
            ticker.tick().await;
            if is_ready() {
                debug!(target: "schemastore::gate", attempt, "Store connection ready");
                return Ok(());
            }
        }

        warn!(
            target: "schemastore::gate",
            attempts = self.config.max_attempts,
            interval_ms = self.config.poll_interval_ms,
            "Gave up waiting for store connection"
        );
        Err(Error::NotReady {
            attempts: self.config.max_attempts,
            interval_ms: self.config.poll_interval_ms,
        })
    }
}
