//! Tests for utility functions

use std::collections::HashMap;

use fair_task_pool::util::{init_tracing, QueueKey, GUEST_KEY};

#[test]
fn test_queue_key_conversions() {
    assert_eq!(QueueKey::from(7), QueueKey::Id(7));
    assert_eq!(QueueKey::from("bob"), QueueKey::Name("bob".to_string()));
    assert_eq!(QueueKey::from(String::from("bob")), QueueKey::from("bob"));
}

#[test]
fn test_queue_key_guest() {
    let guest = QueueKey::guest();
    assert!(guest.is_guest());
    assert_eq!(guest.to_string(), GUEST_KEY);
}

#[test]
fn test_queue_key_hashes_by_value() {
    let mut counts: HashMap<QueueKey, usize> = HashMap::new();
    *counts.entry(QueueKey::from(1)).or_default() += 1;
    *counts.entry(QueueKey::from(1)).or_default() += 1;
    *counts.entry(QueueKey::guest()).or_default() += 1;

    assert_eq!(counts[&QueueKey::from(1)], 2);
    assert_eq!(counts[&QueueKey::guest()], 1);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
