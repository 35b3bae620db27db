//! # Resource Bay Error Types
//!
//! All errors that can occur in the allocation engine, grouped by who is
//! expected to react to them:
//!
//! - [`BayError`]: configuration mistakes (unknown keys, bad capacities)
//! - [`AllocationError`]: a request was rejected, nothing changed
//! - [`SnapshotError`]: a snapshot could not be restored or decoded
//! - [`ConfigError`]: the TOML configuration could not be loaded
//! - [`SinkError`]: an event collaborator failed (always discarded by the engine)

use std::fmt::Write as _;
use std::path::PathBuf;

use bay_shared::{AmountMap, ResourceKey};
use thiserror::Error;

/// Configuration errors raised by capacity and definition operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BayError {
    /// The operation referenced a resource that is not defined.
    #[error("unknown resource: {0}")]
    UnknownResource(ResourceKey),

    /// A capacity below zero was requested.
    #[error("negative capacity {capacity} for resource {key}")]
    NegativeCapacity {
        /// The resource.
        key: ResourceKey,
        /// The rejected capacity.
        capacity: i64,
    },

    /// Adjusting the capacity would overflow.
    #[error("capacity overflow adjusting resource {key} by {delta}")]
    CapacityOverflow {
        /// The resource.
        key: ResourceKey,
        /// The rejected delta.
        delta: i64,
    },
}

/// Result type for ledger configuration operations.
pub type BayResult<T> = Result<T, BayError>;

/// Reasons an allocation request is rejected.
///
/// A rejection never mutates the ledger or the allocation table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The request named no resources.
    #[error("allocation request is empty")]
    EmptyRequest,

    /// A requested amount was zero or negative.
    #[error("invalid amount {amount} requested for resource {key}")]
    InvalidAmount {
        /// The resource.
        key: ResourceKey,
        /// The rejected amount.
        amount: i64,
    },

    /// One or more requested resources are not defined.
    ///
    /// Shortages found on the defined keys are reported alongside, so the
    /// caller sees every problem at once.
    #[error("unknown resources: {}", join_keys(.keys))]
    UnknownResources {
        /// Keys that are not defined.
        keys: Vec<ResourceKey>,
        /// Shortages on the keys that are defined.
        shortages: AmountMap,
    },

    /// The request could not be satisfied in full.
    #[error("insufficient resources: {}", join_amounts(.shortages))]
    Shortage {
        /// Missing amount per resource.
        shortages: AmountMap,
    },
}

impl AllocationError {
    /// Returns the per-resource shortages carried by this rejection.
    #[must_use]
    pub fn shortages(&self) -> Option<&AmountMap> {
        match self {
            Self::Shortage { shortages } | Self::UnknownResources { shortages, .. } => {
                Some(shortages)
            }
            _ => None,
        }
    }

    /// Returns the undefined keys named by this rejection.
    #[must_use]
    pub fn unknown_keys(&self) -> &[ResourceKey] {
        match self {
            Self::UnknownResources { keys, .. } => keys,
            _ => &[],
        }
    }

    /// Returns true for programming/configuration mistakes as opposed to
    /// ordinary shortages.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownResources { .. })
    }
}

/// Errors restoring or decoding a ledger snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Allocations are active; the ledger cannot be replaced.
    #[error("cannot load snapshot: {count} allocations are active")]
    ActiveAllocations {
        /// Number of active allocation records.
        count: usize,
    },

    /// The snapshot lists a key more than once.
    #[error("duplicate resource in snapshot: {0}")]
    DuplicateKey(ResourceKey),

    /// The snapshot carries a negative capacity.
    #[error("negative capacity {capacity} for resource {key} in snapshot")]
    NegativeCapacity {
        /// The resource.
        key: ResourceKey,
        /// The rejected capacity.
        capacity: i64,
    },

    /// The snapshot could not be encoded to text.
    #[error("snapshot encode failed: {0}")]
    Encode(String),

    /// The snapshot text could not be decoded.
    #[error("snapshot decode failed: {0}")]
    Decode(String),
}

/// Errors loading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration is well-formed but semantically invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure reported by an event sink.
///
/// The engine logs and discards these; they never abort an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink is at capacity and dropped the event.
    #[error("event sink full")]
    Full,

    /// Nobody is listening any more.
    #[error("event sink disconnected")]
    Disconnected,

    /// The sink refused the event for its own reasons.
    #[error("event sink rejected event: {0}")]
    Rejected(String),
}

fn join_keys(keys: &[ResourceKey]) -> String {
    keys.iter()
        .map(ResourceKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_amounts(amounts: &AmountMap) -> String {
    let mut out = String::new();
    for (i, (key, amount)) in amounts.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}: {amount}");
    }
    out
}
