//! Tests for builder modules

use std::collections::HashMap;

use fair_task_pool::builders::{build_pools, PoolBuilder};
use fair_task_pool::config::{FairPoolConfig, SchedulerConfig};
use fair_task_pool::core::{FairTaskPool, SchedulerError};
use fair_task_pool::runtime::TokioSpawner;

#[test]
fn test_pool_builder_defaults() {
    let builder = PoolBuilder::new("api", FairPoolConfig::default());
    assert_eq!(builder.name(), "api");
    assert_eq!(builder.config().capacity, None);
    assert!(!builder.config().flush_queue_when_empty);
}

#[test]
fn test_pool_builder_fluent() {
    let builder = PoolBuilder::new("api", FairPoolConfig::default())
        .capacity(5)
        .flush_queue_when_empty(true);
    assert_eq!(builder.config().capacity, Some(5));
    assert!(builder.config().flush_queue_when_empty);

    let builder = builder.unbounded();
    assert_eq!(builder.config().capacity, None);
}

#[tokio::test]
async fn test_pool_builder_build_names_pool_on_error() {
    let spawner = TokioSpawner::try_current().unwrap();
    let err = PoolBuilder::new("uploads", FairPoolConfig::default())
        .capacity(0)
        .build::<u64, _>(spawner)
        .unwrap_err();

    match err {
        SchedulerError::InvalidConfig(msg) => assert!(msg.contains("uploads")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_build_pools_from_config() {
    let mut pools = HashMap::new();
    pools.insert("api".to_string(), FairPoolConfig::default().with_capacity(2));
    pools.insert(
        "reports".to_string(),
        FairPoolConfig::default().with_flush_queue_when_empty(true),
    );
    let cfg = SchedulerConfig { pools };

    let built: HashMap<String, FairTaskPool<String, TokioSpawner>> =
        build_pools(&cfg, TokioSpawner::try_current().unwrap()).unwrap();

    assert_eq!(built.len(), 2);
    assert_eq!(built["api"].capacity(), Some(2));
    assert!(built["reports"].config().flush_queue_when_empty);

    let handle = built["api"]
        .enqueue("alice".to_string(), || async { Ok::<_, ()>(42) })
        .unwrap();
    assert_eq!(handle.await, Ok(42));
}

#[tokio::test]
async fn test_build_pools_rejects_empty_config() {
    let cfg = SchedulerConfig {
        pools: HashMap::new(),
    };
    let result = build_pools::<u64, _>(&cfg, TokioSpawner::try_current().unwrap());
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}
