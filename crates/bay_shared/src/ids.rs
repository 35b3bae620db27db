//! Identifiers shared by the ledger, the allocation table and event payloads.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of a resource type in the ledger (e.g. `"water"`).
///
/// Keys are case-sensitive and ordered by plain byte comparison, so
/// `"Water"` and `"water"` are two different resources.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Creates a key from any string-like value.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ResourceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&ResourceKey> for ResourceKey {
    fn from(value: &ResourceKey) -> Self {
        value.clone()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-resource amounts, ordered by key.
pub type AmountMap = BTreeMap<ResourceKey, i64>;

/// Builds an [`AmountMap`] from `(key, amount)` pairs.
///
/// Later pairs overwrite earlier ones with the same key.
pub fn amount_map<K, I>(pairs: I) -> AmountMap
where
    K: Into<ResourceKey>,
    I: IntoIterator<Item = (K, i64)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Unique identifier of one allocation record.
///
/// Wraps a random 128-bit value. The raw bytes are not exposed; the
/// `Display` form exists for logs and diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationId(Uuid);

impl AllocationId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
