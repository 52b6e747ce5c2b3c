//! Shared utilities.

pub mod key;
pub mod telemetry;

pub use key::*;
pub use telemetry::*;
