//! Runtime adapters and the request-facing boundary helpers.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{quota, Quota, Rejection, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
