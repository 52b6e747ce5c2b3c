//! Pool and scheduler configuration structures.

use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Environment variable holding the per-key capacity.
pub const CAPACITY_ENV: &str = "FAIR_POOL_CAPACITY";
/// Environment variable toggling auto-disposal of drained queues.
pub const FLUSH_QUEUE_WHEN_EMPTY_ENV: &str = "FAIR_POOL_FLUSH_QUEUE_WHEN_EMPTY";

/// Policy shared by every queue of a fair task pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairPoolConfig {
    /// Maximum pending tasks per key. `None` means unbounded.
    pub capacity: Option<usize>,
    /// Drop a key's queue as soon as it drains instead of keeping it idle.
    #[serde(alias = "flushQueueWhenEmpty")]
    pub flush_queue_when_empty: bool,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, FairPoolConfig>,
}

impl FairPoolConfig {
    /// Set the per-key capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Enable or disable auto-disposal of drained queues.
    #[must_use]
    pub const fn with_flush_queue_when_empty(mut self, flush: bool) -> Self {
        self.flush_queue_when_empty = flush;
        self
    }

    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Fails when a capacity is set to zero, which would reject every task.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == Some(0) {
            return Err("capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Load from the process environment, reading a `.env` file first if one
    /// is present.
    ///
    /// Unset variables fall back to the defaults (unbounded, no flushing).
    ///
    /// # Errors
    ///
    /// Fails when a variable is set but cannot be parsed, or the result does
    /// not validate.
    pub fn from_env() -> AppResult<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err).context("failed to load .env file");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`FairPoolConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity = lookup(CAPACITY_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("{CAPACITY_ENV} must be a positive integer, got `{raw}`"))
            })
            .transpose()?;
        let flush_queue_when_empty = lookup(FLUSH_QUEUE_WHEN_EMPTY_ENV)
            .map(|raw| parse_flag(&raw))
            .transpose()
            .with_context(|| format!("invalid {FLUSH_QUEUE_WHEN_EMPTY_ENV}"))?
            .unwrap_or(false);

        let cfg = Self {
            capacity,
            flush_queue_when_empty,
        };
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn parse_flag(raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got `{other}`")),
    }
}

impl SchedulerConfig {
    /// Validate all pools and ensure at least one pool exists.
    ///
    /// # Errors
    ///
    /// Names the first pool that fails validation.
    pub fn validate(&self) -> Result<(), String> {
        if self.pools.is_empty() {
            return Err("at least one pool must be defined".into());
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| format!("pool `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or invalid pool settings.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
