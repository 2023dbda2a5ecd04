//! ID types for prefabs and spawned instances.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for instance IDs.
static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a spawned entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Creates a new unique instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an instance ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid instance ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) instance ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// String key naming a prefab template.
///
/// Comparison is exact and case-sensitive. `Borrow<str>` lets maps keyed by
/// tags be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabTag(String);

impl PrefabTag {
    /// Creates a tag from any string-like value.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrefabTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PrefabTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefabTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for PrefabTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl PartialEq<str> for PrefabTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PrefabTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
