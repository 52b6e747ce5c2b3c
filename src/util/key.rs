//! Ready-made key type for pools partitioned by caller identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name shared by every unauthenticated caller.
pub const GUEST_KEY: &str = "guest";

/// Partition key that is either a numeric identity or a name.
///
/// `QueueKey::Id(1)` and `QueueKey::Name("1".into())` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueKey {
    /// Numeric identity, e.g. a user id.
    Id(u64),
    /// Named identity.
    Name(String),
}

impl QueueKey {
    /// Key shared by all callers without an identity, so they compete for a
    /// single backlog.
    pub fn guest() -> Self {
        Self::Name(GUEST_KEY.to_string())
    }

    /// Whether this is the shared guest key.
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Name(name) if name == GUEST_KEY)
    }
}

impl From<u64> for QueueKey {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for QueueKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for QueueKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for QueueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
