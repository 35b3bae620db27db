//! # Resource Ledger
//!
//! Per-key bookkeeping of capacity and allocated total.
//!
//! The ledger answers "how much exists" and "how much is free". It never
//! decides whether an allocation is allowed; that is the engine's job. The
//! engine owns the only ledger instance and is the only caller of the
//! crate-private reservation methods.
//!
//! ## Shrinking Capacity
//!
//! Capacity may be set below the amount currently allocated. This is a valid
//! operational action (e.g. a power plant goes offline): `available` simply
//! goes negative until enough is released. Nothing is revoked.

use std::collections::BTreeMap;

use bay_shared::ResourceKey;
use serde::{Deserialize, Serialize};

use crate::error::{BayError, BayResult};

/// Capacity and allocated total of a single resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceEntry {
    capacity: i64,
    allocated_total: i64,
}

impl ResourceEntry {
    /// Maximum amount that may be allocated at once.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Sum of all active grants for this resource.
    #[inline]
    #[must_use]
    pub const fn allocated_total(&self) -> i64 {
        self.allocated_total
    }

    /// `capacity - allocated_total`; negative after a capacity shrink.
    #[inline]
    #[must_use]
    pub const fn available(&self) -> i64 {
        self.capacity - self.allocated_total
    }
}

/// Point-in-time totals for one resource, as returned by
/// [`ResourceLedger::totals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTotals {
    /// Capacity.
    pub capacity: i64,
    /// Allocated total.
    pub allocated: i64,
    /// Available amount (may be negative).
    pub available: i64,
}

impl From<ResourceEntry> for ResourceTotals {
    fn from(entry: ResourceEntry) -> Self {
        Self {
            capacity: entry.capacity,
            allocated: entry.allocated_total,
            available: entry.available(),
        }
    }
}

/// The resource ledger, keyed by [`ResourceKey`] in byte order.
#[derive(Clone, Debug, Default)]
pub struct ResourceLedger {
    entries: BTreeMap<ResourceKey, ResourceEntry>,
}

impl ResourceLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a resource, or replaces the capacity of an existing one.
    ///
    /// An existing resource keeps its allocated total.
    ///
    /// # Returns
    ///
    /// The previous capacity if the resource already existed.
    ///
    /// # Errors
    ///
    /// Returns `BayError::NegativeCapacity` if `capacity < 0`.
    pub fn define(&mut self, key: ResourceKey, capacity: i64) -> BayResult<Option<i64>> {
        if capacity < 0 {
            return Err(BayError::NegativeCapacity { key, capacity });
        }

        match self.entries.get_mut(key.as_str()) {
            Some(entry) => Ok(Some(std::mem::replace(&mut entry.capacity, capacity))),
            None => {
                self.entries.insert(
                    key,
                    ResourceEntry {
                        capacity,
                        allocated_total: 0,
                    },
                );
                Ok(None)
            }
        }
    }

    /// Removes a resource.
    ///
    /// Returns `false` if the key is unknown OR the resource still has
    /// allocations; both cases are reported the same way.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.allocated_total == 0 => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Checks whether a resource is defined.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets the entry of a resource.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key)
    }

    /// Gets the capacity of a resource.
    #[must_use]
    pub fn capacity(&self, key: &str) -> Option<i64> {
        self.get(key).map(ResourceEntry::capacity)
    }

    /// Gets the available amount of a resource.
    #[must_use]
    pub fn available(&self, key: &str) -> Option<i64> {
        self.get(key).map(ResourceEntry::available)
    }

    /// Gets the allocated total of a resource.
    #[must_use]
    pub fn allocated_total(&self, key: &str) -> Option<i64> {
        self.get(key).map(ResourceEntry::allocated_total)
    }

    /// Checks whether the capacity of a resource is at least `amount`.
    ///
    /// Unknown resources have no capacity.
    #[must_use]
    pub fn has_capacity(&self, key: &str, amount: i64) -> bool {
        self.capacity(key).is_some_and(|capacity| capacity >= amount)
    }

    /// Checks whether at least `amount` of a resource is available right now.
    ///
    /// Unknown resources have nothing available.
    #[must_use]
    pub fn has_available(&self, key: &str, amount: i64) -> bool {
        self.available(key).is_some_and(|available| available >= amount)
    }

    /// Replaces the capacity of an existing resource.
    ///
    /// # Returns
    ///
    /// The previous capacity.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if the key is not defined
    /// - `NegativeCapacity` if `capacity < 0`
    pub fn set_capacity(&mut self, key: &str, capacity: i64) -> BayResult<i64> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| BayError::UnknownResource(ResourceKey::from(key)))?;

        if capacity < 0 {
            return Err(BayError::NegativeCapacity {
                key: ResourceKey::from(key),
                capacity,
            });
        }

        Ok(std::mem::replace(&mut entry.capacity, capacity))
    }

    /// Adds `delta` (possibly negative) to the capacity of an existing resource.
    ///
    /// # Returns
    ///
    /// `(old, new)` capacities.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if the key is not defined
    /// - `CapacityOverflow` if the sum overflows
    /// - `NegativeCapacity` if the result would be below zero
    pub fn adjust_capacity(&mut self, key: &str, delta: i64) -> BayResult<(i64, i64)> {
        let old = self
            .capacity(key)
            .ok_or_else(|| BayError::UnknownResource(ResourceKey::from(key)))?;

        let new = old.checked_add(delta).ok_or_else(|| BayError::CapacityOverflow {
            key: ResourceKey::from(key),
            delta,
        })?;

        self.set_capacity(key, new)?;
        Ok((old, new))
    }

    /// Returns every defined key in byte order.
    #[must_use]
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.entries.keys().cloned().collect()
    }

    /// Returns capacity, allocated and available for every resource.
    #[must_use]
    pub fn totals(&self) -> BTreeMap<ResourceKey, ResourceTotals> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), ResourceTotals::from(*entry)))
            .collect()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &ResourceEntry)> {
        self.entries.iter()
    }

    /// Returns the number of defined resources.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no resources are defined.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Engine-only mutation (callers have already validated)
    // ========================================================================

    /// Adds `amount` to the allocated total of a defined resource.
    pub(crate) fn reserve(&mut self, key: &str, amount: i64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.allocated_total += amount;
        }
    }

    /// Subtracts `amount` from the allocated total of a defined resource.
    ///
    /// `amount` must not exceed the allocated total; releasing more than was
    /// reserved means the ledger and the allocation records have diverged.
    pub(crate) fn unreserve(&mut self, key: &str, amount: i64) {
        if let Some(entry) = self.entries.get_mut(key) {
            debug_assert!(
                entry.allocated_total >= amount,
                "over-release of {key}: allocated {}, releasing {amount}",
                entry.allocated_total
            );
            entry.allocated_total -= amount;
        }
    }

    /// Sets every allocated total to zero, keeping capacities.
    pub(crate) fn clear_allocations(&mut self) {
        for entry in self.entries.values_mut() {
            entry.allocated_total = 0;
        }
    }

    /// Replaces the whole ledger with fresh, unallocated entries.
    pub(crate) fn replace_all(&mut self, capacities: impl IntoIterator<Item = (ResourceKey, i64)>) {
        self.entries = capacities
            .into_iter()
            .map(|(key, capacity)| {
                (
                    key,
                    ResourceEntry {
                        capacity,
                        allocated_total: 0,
                    },
                )
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(pairs: &[(&str, i64)]) -> ResourceLedger {
        let mut ledger = ResourceLedger::new();
        for &(key, capacity) in pairs {
            ledger.define(ResourceKey::from(key), capacity).unwrap();
        }
        ledger
    }

    #[test]
    fn test_define_and_query() {
        let ledger = ledger_with(&[("water", 100), ("energy", 50)]);

        assert!(ledger.contains("water"));
        assert!(!ledger.contains("Water"));
        assert_eq!(ledger.capacity("water"), Some(100));
        assert_eq!(ledger.available("energy"), Some(50));
        assert_eq!(ledger.allocated_total("energy"), Some(0));
        assert_eq!(ledger.keys(), vec![ResourceKey::from("energy"), ResourceKey::from("water")]);
    }

    #[test]
    fn test_redefine_keeps_allocated_total() {
        let mut ledger = ledger_with(&[("water", 100)]);
        ledger.reserve("water", 40);

        let previous = ledger.define(ResourceKey::from("water"), 30).unwrap();
        assert_eq!(previous, Some(100));
        assert_eq!(ledger.allocated_total("water"), Some(40));

        // Shrinking below the allocation drives available negative
        assert_eq!(ledger.available("water"), Some(-10));
    }

    #[test]
    fn test_define_rejects_negative_capacity() {
        let mut ledger = ResourceLedger::new();
        let result = ledger.define(ResourceKey::from("water"), -1);
        assert!(matches!(result, Err(BayError::NegativeCapacity { capacity: -1, .. })));
        assert!(!ledger.contains("water"));
    }

    #[test]
    fn test_remove_blocked_by_allocations() {
        let mut ledger = ledger_with(&[("water", 100)]);
        ledger.reserve("water", 1);

        assert!(!ledger.remove("water"));
        assert!(ledger.contains("water"));

        ledger.unreserve("water", 1);
        assert!(ledger.remove("water"));
        assert!(!ledger.contains("water"));

        // Unknown key fails the same way
        assert!(!ledger.remove("water"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "over-release of water")]
    fn test_over_release_is_caught() {
        let mut ledger = ledger_with(&[("water", 100)]);
        ledger.reserve("water", 5);
        ledger.unreserve("water", 6);
    }

    #[test]
    fn test_set_capacity_unknown_key() {
        let mut ledger = ResourceLedger::new();
        let result = ledger.set_capacity("water", 10);
        assert_eq!(result, Err(BayError::UnknownResource(ResourceKey::from("water"))));
    }

    #[test]
    fn test_adjust_capacity() {
        let mut ledger = ledger_with(&[("water", 100)]);

        assert_eq!(ledger.adjust_capacity("water", -30), Ok((100, 70)));
        assert_eq!(ledger.capacity("water"), Some(70));

        // Going below zero is refused and leaves the entry untouched
        let result = ledger.adjust_capacity("water", -71);
        assert!(matches!(result, Err(BayError::NegativeCapacity { capacity: -1, .. })));
        assert_eq!(ledger.capacity("water"), Some(70));

        let result = ledger.adjust_capacity("water", i64::MAX);
        assert!(matches!(result, Err(BayError::CapacityOverflow { .. })));
    }

    #[test]
    fn test_has_capacity_and_available() {
        let mut ledger = ledger_with(&[("water", 100)]);
        ledger.reserve("water", 60);

        assert!(ledger.has_capacity("water", 100));
        assert!(!ledger.has_capacity("water", 101));
        assert!(ledger.has_available("water", 40));
        assert!(!ledger.has_available("water", 41));
        assert!(!ledger.has_capacity("mana", 0));
        assert!(!ledger.has_available("mana", 0));
    }

    #[test]
    fn test_totals_and_clear() {
        let mut ledger = ledger_with(&[("water", 100), ("energy", 50)]);
        ledger.reserve("water", 25);

        let totals = ledger.totals();
        assert_eq!(
            totals["water"],
            ResourceTotals {
                capacity: 100,
                allocated: 25,
                available: 75
            }
        );

        ledger.clear_allocations();
        assert_eq!(ledger.allocated_total("water"), Some(0));
        assert_eq!(ledger.capacity("water"), Some(100));
    }
}
