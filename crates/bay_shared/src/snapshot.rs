//! # Ledger Snapshot Schema
//!
//! The persisted form of the resource ledger:
//!
//! ```toml
//! [[resources]]
//! key = "water"
//! capacity = 100
//! allocatedTotal = 0
//! ```
//!
//! `allocatedTotal` is written for information and compatibility with older
//! saves. It is never used to seed live allocations on load, because no
//! allocation records travel with the snapshot.

use serde::{Deserialize, Serialize};

use crate::ids::ResourceKey;

/// One resource in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Resource key.
    pub key: ResourceKey,
    /// Capacity at capture time.
    pub capacity: i64,
    /// Allocated total at capture time (advisory).
    #[serde(rename = "allocatedTotal", default)]
    pub allocated_total: i64,
}

impl SnapshotEntry {
    /// Creates a snapshot entry.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<ResourceKey>, capacity: i64, allocated_total: i64) -> Self {
        Self {
            key: key.into(),
            capacity,
            allocated_total,
        }
    }
}

/// Point-in-time capture of every resource in the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaySnapshot {
    /// Captured resources, ordered by key.
    #[serde(default)]
    pub resources: Vec<SnapshotEntry>,
}

impl BaySnapshot {
    /// Returns the number of resources in the snapshot.
    #[inline]
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Looks up the captured capacity of a resource.
    #[must_use]
    pub fn capacity_of(&self, key: &str) -> Option<i64> {
        self.resources
            .iter()
            .find(|entry| entry.key.as_str() == key)
            .map(|entry| entry.capacity)
    }

    /// Serializes the snapshot to TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer rejects the document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Parses a snapshot from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot document.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_field_names() {
        let snapshot = BaySnapshot {
            resources: vec![SnapshotEntry::new("water", 100, 40)],
        };
        let text = snapshot.to_toml_string().unwrap();

        assert!(text.contains("[[resources]]"));
        assert!(text.contains("allocatedTotal = 40"));
        assert!(text.contains("key = \"water\""));
    }

    #[test]
    fn test_parse_legacy_without_allocated_total() {
        let text = r#"
            [[resources]]
            key = "energy"
            capacity = 50

            [[resources]]
            key = "water"
            capacity = 100
            allocatedTotal = 0
        "#;

        let snapshot = BaySnapshot::from_toml_str(text).unwrap();
        assert_eq!(snapshot.resource_count(), 2);
        assert_eq!(snapshot.capacity_of("energy"), Some(50));
        assert_eq!(snapshot.resources[0].allocated_total, 0);
        assert_eq!(snapshot.capacity_of("compute"), None);
    }

    #[test]
    fn test_empty_document_is_empty_snapshot() {
        let snapshot = BaySnapshot::from_toml_str("").unwrap();
        assert_eq!(snapshot.resource_count(), 0);
    }
}
