//! Tests for configuration validation

use std::collections::HashMap;

use fair_task_pool::config::{FairPoolConfig, SchedulerConfig};

#[test]
fn test_pool_config_defaults() {
    let config = FairPoolConfig::default();
    assert_eq!(config.capacity, None);
    assert!(!config.flush_queue_when_empty);
    assert!(config.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_capacity() {
    let invalid = FairPoolConfig::default().with_capacity(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_validation() {
    let mut pools = HashMap::new();
    pools.insert("api".to_string(), FairPoolConfig::default().with_capacity(2));

    let config = SchedulerConfig { pools };
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_empty_pools() {
    let config = SchedulerConfig {
        pools: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_names_invalid_pool() {
    let mut pools = HashMap::new();
    pools.insert("uploads".to_string(), FairPoolConfig::default().with_capacity(0));

    let err = SchedulerConfig { pools }.validate().unwrap_err();
    assert!(err.contains("uploads"));
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "pools": {
            "api": {
                "capacity": 2,
                "flush_queue_when_empty": true
            },
            "reports": {}
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.pools["api"].capacity, Some(2));
    assert!(config.pools["api"].flush_queue_when_empty);
    assert_eq!(config.pools["reports"], FairPoolConfig::default());
}

#[test]
fn test_scheduler_config_accepts_camel_case_flag() {
    let json = r#"{ "pools": { "api": { "capacity": 3, "flushQueueWhenEmpty": true } } }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert!(config.pools["api"].flush_queue_when_empty);
}

#[test]
fn test_scheduler_config_from_bad_json() {
    assert!(SchedulerConfig::from_json_str("{ not json").is_err());
    assert!(SchedulerConfig::from_json_str(r#"{ "pools": { "api": { "capacity": 0 } } }"#).is_err());
}
