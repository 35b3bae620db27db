//! # Allocation Table
//!
//! Maps allocation identifiers to the records of who holds what.
//!
//! An owner index is kept next to the records so that bulk release by owner
//! does not scan the whole table.

use std::collections::{BTreeSet, HashMap};

use bay_shared::{AllocationId, AmountMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One granted allocation.
///
/// Every amount in `resources` is strictly positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Unique identifier.
    pub id: AllocationId,
    /// Owner named in the request.
    pub owner_id: Option<String>,
    /// Amount held per resource.
    pub resources: AmountMap,
    /// Request tags.
    pub tags: Vec<String>,
    /// Free-form request context.
    pub context: Option<String>,
    /// When the allocation was granted.
    pub created_at: DateTime<Utc>,
}

impl AllocationRecord {
    /// Amount of a resource held by this record (0 if none).
    #[inline]
    #[must_use]
    pub fn held(&self, key: &str) -> i64 {
        self.resources.get(key).copied().unwrap_or(0)
    }

    /// Returns true if the record holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// All active allocation records.
#[derive(Clone, Debug, Default)]
pub struct AllocationTable {
    /// Records indexed by ID.
    records: HashMap<AllocationId, AllocationRecord>,
    /// Owners mapped to the records they hold.
    by_owner: HashMap<String, BTreeSet<AllocationId>>,
}

impl AllocationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, indexing it by owner.
    pub fn insert(&mut self, record: AllocationRecord) {
        if let Some(owner) = &record.owner_id {
            self.by_owner.entry(owner.clone()).or_default().insert(record.id);
        }
        self.records.insert(record.id, record);
    }

    /// Gets a record by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: AllocationId) -> Option<&AllocationRecord> {
        self.records.get(&id)
    }

    /// Gets a record for in-place shrinking. Owners never change.
    pub(crate) fn get_mut(&mut self, id: AllocationId) -> Option<&mut AllocationRecord> {
        self.records.get_mut(&id)
    }

    /// Removes a record and its owner index entry.
    pub fn remove(&mut self, id: AllocationId) -> Option<AllocationRecord> {
        let record = self.records.remove(&id)?;

        if let Some(owner) = &record.owner_id {
            if let Some(ids) = self.by_owner.get_mut(owner) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.by_owner.remove(owner);
                }
            }
        }

        Some(record)
    }

    /// Returns the IDs held by an owner, in ID order.
    #[must_use]
    pub fn owner_ids(&self, owner: &str) -> Vec<AllocationId> {
        self.by_owner
            .get(owner)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Iterates over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.values()
    }

    /// Sums the amounts held by all records, per resource.
    #[must_use]
    pub fn held_totals(&self) -> AmountMap {
        let mut totals = AmountMap::new();
        for record in self.records.values() {
            for (key, amount) in &record.resources {
                *totals.entry(key.clone()).or_insert(0) += amount;
            }
        }
        totals
    }

    /// Returns the number of active records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are active.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_owner.clear();
    }
}
