//! Tests for error types

use fair_task_pool::core::{SchedulerError, TaskError};

#[test]
fn test_capacity_exceeded_error() {
    let err = SchedulerError::CapacityExceeded { capacity: 2 };
    assert_eq!(format!("{}", err), "exceed task queue capacity of 2");
    assert_eq!(err.status_code(), 429);
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("capacity must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: capacity must be greater than 0"
    );
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.capacity(), None);
}

#[test]
fn test_runtime_error() {
    let err = SchedulerError::Runtime("no reactor".to_string());
    assert_eq!(format!("{}", err), "runtime unavailable: no reactor");
}

#[test]
fn test_task_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(TaskError::Failed("not found".to_string()));
    assert_eq!(err.to_string(), "task failed: not found");

    let err: TaskError<String> = TaskError::Abandoned;
    assert_eq!(format!("{}", err), "task abandoned before it ran");
}
