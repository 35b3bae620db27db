//! Events published by the Resource Bay after each state change.
//!
//! Events are fire-and-forget notifications. They are emitted only after the
//! engine has released its lock, so a subscriber observing an event may call
//! straight back into the engine.

use serde::{Deserialize, Serialize};

use crate::ids::{AllocationId, AmountMap, ResourceKey};

/// Event type discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BayEventKind {
    /// Resource defined or redefined
    ResourceDefined = 0,
    /// Resource removed
    ResourceRemoved = 1,
    /// Capacity changed
    CapacityChanged = 2,
    /// Allocation granted
    AllocationGranted = 3,
    /// Allocation rejected
    AllocationRejected = 4,
    /// Allocation fully released
    AllocationReleased = 5,
    /// Allocation partially released
    AllocationPartiallyReleased = 6,
    /// Snapshot loaded
    SnapshotLoaded = 7,
    /// All allocations reset
    AllocationsReset = 8,
}

/// Domain events of the resource ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BayEvent {
    /// A resource was created, or an existing one had its capacity replaced.
    ResourceDefined {
        /// Resource key.
        key: ResourceKey,
        /// Capacity after the definition.
        capacity: i64,
    },

    /// A resource was removed from the ledger.
    ResourceRemoved {
        /// Resource key.
        key: ResourceKey,
    },

    /// Capacity of an existing resource changed.
    CapacityChanged {
        /// Resource key.
        key: ResourceKey,
        /// Capacity before the change.
        old: i64,
        /// Capacity after the change.
        new: i64,
    },

    /// An allocation was granted and recorded.
    AllocationGranted {
        /// Identifier of the new record.
        id: AllocationId,
        /// Owner named in the request.
        owner: Option<String>,
        /// Amounts actually granted.
        granted: AmountMap,
        /// Free-form request context.
        context: Option<String>,
        /// Request tags.
        tags: Vec<String>,
    },

    /// An allocation request was rejected with no side effects.
    AllocationRejected {
        /// Owner named in the request.
        owner: Option<String>,
        /// Amounts that were requested.
        requested: AmountMap,
        /// Human-readable rejection reason.
        error: String,
        /// Free-form request context.
        context: Option<String>,
        /// Request tags.
        tags: Vec<String>,
    },

    /// An allocation record was released in full and removed.
    AllocationReleased {
        /// Identifier of the released record.
        id: AllocationId,
        /// Owner of the record.
        owner: Option<String>,
        /// Everything the record held at release time.
        released: AmountMap,
    },

    /// Part of an allocation record was released; the record stays active.
    AllocationPartiallyReleased {
        /// Identifier of the record.
        id: AllocationId,
        /// Owner of the record.
        owner: Option<String>,
        /// Amounts released by this call.
        released: AmountMap,
        /// Amounts still held after this call.
        remaining: AmountMap,
    },

    /// The ledger was replaced from a snapshot.
    SnapshotLoaded {
        /// Number of resources defined after the load.
        resource_count: usize,
    },

    /// Every allocation was dropped by a hard reset.
    AllocationsReset {
        /// Number of records cleared.
        cleared: usize,
    },
}

impl BayEvent {
    /// Returns the event type
    #[must_use]
    pub const fn kind(&self) -> BayEventKind {
        match self {
            Self::ResourceDefined { .. } => BayEventKind::ResourceDefined,
            Self::ResourceRemoved { .. } => BayEventKind::ResourceRemoved,
            Self::CapacityChanged { .. } => BayEventKind::CapacityChanged,
            Self::AllocationGranted { .. } => BayEventKind::AllocationGranted,
            Self::AllocationRejected { .. } => BayEventKind::AllocationRejected,
            Self::AllocationReleased { .. } => BayEventKind::AllocationReleased,
            Self::AllocationPartiallyReleased { .. } => BayEventKind::AllocationPartiallyReleased,
            Self::SnapshotLoaded { .. } => BayEventKind::SnapshotLoaded,
            Self::AllocationsReset { .. } => BayEventKind::AllocationsReset,
        }
    }

    /// Returns the allocation this event concerns (if applicable)
    #[must_use]
    pub fn allocation_id(&self) -> Option<AllocationId> {
        match self {
            Self::AllocationGranted { id, .. }
            | Self::AllocationReleased { id, .. }
            | Self::AllocationPartiallyReleased { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Returns the owner named by this event (if applicable)
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::AllocationGranted { owner, .. }
            | Self::AllocationRejected { owner, .. }
            | Self::AllocationReleased { owner, .. }
            | Self::AllocationPartiallyReleased { owner, .. } => owner.as_deref(),
            _ => None,
        }
    }
}
