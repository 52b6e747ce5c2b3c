//! Telemetry helpers for structured logging and tracing.

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
///
/// Queue activity is logged under the `fair_task_pool` target, with each run
/// loop inside a `task_queue` span carrying its key, so
/// `RUST_LOG=fair_task_pool=debug` shows queue creation and disposal.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
