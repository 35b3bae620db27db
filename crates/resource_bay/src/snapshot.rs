//! # Snapshot Codec
//!
//! Converts the ledger to and from [`BaySnapshot`].
//!
//! Restoring is gated on zero active allocations across the whole ledger,
//! the same "active references block structural change" rule that blocks
//! `remove_resource`. A restore replaces the ledger completely and resets
//! every allocated total to zero; the snapshot's `allocatedTotal` field is
//! advisory only.

use std::collections::BTreeSet;

use bay_shared::{BaySnapshot, SnapshotEntry};

use crate::error::SnapshotError;
use crate::ledger::ResourceLedger;
use crate::table::AllocationTable;

/// Ledger snapshot capture, validation and restoration.
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Captures every resource of the ledger, in key order.
    #[must_use]
    pub fn capture(ledger: &ResourceLedger) -> BaySnapshot {
        BaySnapshot {
            resources: ledger
                .iter()
                .map(|(key, entry)| {
                    SnapshotEntry::new(key.clone(), entry.capacity(), entry.allocated_total())
                })
                .collect(),
        }
    }

    /// Checks a snapshot for duplicate keys and negative capacities.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in snapshot order.
    pub fn validate(snapshot: &BaySnapshot) -> Result<(), SnapshotError> {
        let mut seen = BTreeSet::new();
        for entry in &snapshot.resources {
            if entry.capacity < 0 {
                return Err(SnapshotError::NegativeCapacity {
                    key: entry.key.clone(),
                    capacity: entry.capacity,
                });
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(SnapshotError::DuplicateKey(entry.key.clone()));
            }
        }
        Ok(())
    }

    /// Replaces the ledger with the snapshot's resources.
    ///
    /// # Returns
    ///
    /// The number of resources defined after the restore.
    ///
    /// # Errors
    ///
    /// - `ActiveAllocations` if any allocation is active
    /// - `DuplicateKey` / `NegativeCapacity` if the snapshot is malformed
    ///
    /// On error the ledger is untouched.
    pub(crate) fn restore(
        ledger: &mut ResourceLedger,
        table: &AllocationTable,
        snapshot: &BaySnapshot,
    ) -> Result<usize, SnapshotError> {
        let ledger_allocated = ledger.iter().any(|(_, entry)| entry.allocated_total() > 0);
        if !table.is_empty() || ledger_allocated {
            return Err(SnapshotError::ActiveAllocations { count: table.len() });
        }

        Self::validate(snapshot)?;

        ledger.replace_all(
            snapshot
                .resources
                .iter()
                .map(|entry| (entry.key.clone(), entry.capacity)),
        );
        Ok(ledger.len())
    }

    /// Encodes a snapshot as TOML text.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Encode` if serialization fails.
    pub fn encode(snapshot: &BaySnapshot) -> Result<String, SnapshotError> {
        snapshot
            .to_toml_string()
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decodes and validates a snapshot from TOML text.
    ///
    /// # Errors
    ///
    /// - `Decode` if the text is not a snapshot document
    /// - `DuplicateKey` / `NegativeCapacity` if the snapshot is malformed
    pub fn decode(text: &str) -> Result<BaySnapshot, SnapshotError> {
        let snapshot =
            BaySnapshot::from_toml_str(text).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Self::validate(&snapshot)?;
        Ok(snapshot)
    }
}
