//! Builders to construct fair task pools from configuration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::config::{FairPoolConfig, SchedulerConfig};
use crate::core::{FairTaskPool, SchedulerError, Spawn};

/// Fluent construction of a single named pool.
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    name: String,
    config: FairPoolConfig,
}

impl PoolBuilder {
    /// Start from an existing configuration.
    pub fn new(name: impl Into<String>, config: FairPoolConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Pool name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration as built so far.
    pub const fn config(&self) -> &FairPoolConfig {
        &self.config
    }

    /// Limit every key to `capacity` pending tasks.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = Some(capacity);
        self
    }

    /// Drop the capacity limit.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.config.capacity = None;
        self
    }

    /// Dispose of queues once they drain.
    #[must_use]
    pub fn flush_queue_when_empty(mut self, flush: bool) -> Self {
        self.config.flush_queue_when_empty = flush;
        self
    }

    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] naming this pool when the
    /// configuration does not validate.
    pub fn build<K, S>(self, spawner: S) -> Result<FairTaskPool<K, S>, SchedulerError>
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
        S: Spawn + Clone + Send + Sync + 'static,
    {
        let Self { name, config } = self;
        FairTaskPool::new(config, spawner).map_err(|err| match err {
            SchedulerError::InvalidConfig(msg) => {
                SchedulerError::InvalidConfig(format!("pool `{name}` invalid: {msg}"))
            }
            other => other,
        })
    }
}

/// Build one pool per entry of a scheduler configuration, all sharing the
/// same spawner.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfig`] if the configuration as a whole
/// does not validate.
pub fn build_pools<K, S>(
    cfg: &SchedulerConfig,
    spawner: S,
) -> Result<HashMap<String, FairTaskPool<K, S>>, SchedulerError>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    let mut pools = HashMap::new();
    for (name, pool_cfg) in &cfg.pools {
        let pool = PoolBuilder::new(name.clone(), pool_cfg.clone()).build(spawner.clone())?;
        tracing::info!(pool = %name, capacity = ?pool_cfg.capacity, "built fair task pool");
        pools.insert(name.clone(), pool);
    }

    Ok(pools)
}
