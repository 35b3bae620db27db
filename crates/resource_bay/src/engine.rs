//! # The Allocation Engine
//!
//! [`ResourceBay`] owns the ledger and the allocation table and is the only
//! thing that mutates them.
//!
//! ## The Allocation Pipeline
//!
//! ```text
//! try_allocate(request)
//!   1. Lock ledger + table (one mutex)
//!   2. Validate every key and amount (no mutation yet)
//!   3. Reject with the full shortage map  -OR-  reserve + record
//!   4. Unlock
//!   5. Publish events / write logs
//! ```
//!
//! Validation always completes before the first mutation, so a rejected
//! operation never needs a rollback and leaves state unchanged.
//!
//! ## Thread Safety
//!
//! `ResourceBay` is `Send + Sync` and is meant to be shared behind an `Arc`.
//! Concurrent calls are linearized by the lock. Collaborators are called only
//! after the lock is released, so a subscriber may call back into the engine.
//!
//! Notifications are queued in lock order and delivered by one thread at a
//! time, so every subscriber sees events in the order the state changed. If
//! another thread is already delivering, a call may return before its own
//! events have been published; that thread publishes them.

use std::collections::{BTreeMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bay_shared::{AllocationId, AmountMap, BayEvent, BaySnapshot, ResourceKey};
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{AllocationError, BayResult, SnapshotError};
use crate::ledger::{ResourceLedger, ResourceTotals};
use crate::request::{AllocationGrant, AllocationRequest, PartialRelease};
use crate::snapshot::SnapshotCodec;
use crate::table::{AllocationRecord, AllocationTable};
use crate::telemetry::{BayLogger, EventSink, LogLevel};

/// Operation counters since the engine was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BayStats {
    /// Allocations granted (including best-effort grants of nothing).
    pub grants: u64,
    /// Allocation requests rejected.
    pub rejections: u64,
    /// Records released in full (by ID, by owner, or emptied by a partial release).
    pub releases: u64,
    /// Partial releases that left the record active.
    pub partial_releases: u64,
    /// Hard resets.
    pub resets: u64,
    /// Snapshots loaded.
    pub snapshots_loaded: u64,
}

/// One key where the ledger disagrees with the allocation records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditDiscrepancy {
    /// The resource.
    pub key: ResourceKey,
    /// Allocated total according to the ledger.
    pub ledger_total: i64,
    /// Sum of the amounts held by active records.
    pub record_total: i64,
}

/// Result of [`ResourceBay::audit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerAudit {
    /// Number of active records checked.
    pub records: usize,
    /// Keys where the ledger total and the record sum differ.
    pub discrepancies: Vec<AuditDiscrepancy>,
}

impl LedgerAudit {
    /// Returns true if every allocated total matches its records.
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Ledger and table, guarded together.
#[derive(Default)]
struct BayState {
    ledger: ResourceLedger,
    table: AllocationTable,
    stats: BayStats,
}

/// Notifications collected inside the critical section.
#[derive(Default)]
struct Outbox {
    events: Vec<BayEvent>,
    logs: Vec<(LogLevel, String)>,
}

impl Outbox {
    fn is_empty(&self) -> bool {
        self.events.is_empty() && self.logs.is_empty()
    }

    fn event(&mut self, event: BayEvent) {
        self.events.push(event);
    }

    fn info(&mut self, message: String) {
        self.logs.push((LogLevel::Info, message));
    }

    fn warning(&mut self, message: String) {
        self.logs.push((LogLevel::Warning, message));
    }

    fn error(&mut self, message: String) {
        self.logs.push((LogLevel::Error, message));
    }
}

/// Outboxes waiting for delivery, in lock order.
#[derive(Default)]
struct DispatchQueue {
    pending: VecDeque<Outbox>,
    /// A thread is currently delivering.
    draining: bool,
}

/// Validated allocation, ready to commit.
struct AllocationPlan {
    granted: AmountMap,
    shortfall: AmountMap,
    unknown: Vec<ResourceKey>,
}

/// The resource allocation engine.
///
/// ## Usage
///
/// ```rust,ignore
/// let bay = ResourceBay::builder()
///     .event_sink(Arc::new(bus.sender()))
///     .logger(Arc::new(TracingLogger))
///     .build();
///
/// bay.define_resource("water", 100)?;
/// let grant = bay.try_allocate(AllocationRequest::new().with("water", 40).with_owner("farm1"))?;
/// assert_eq!(bay.available("water"), Some(60));
/// bay.release(grant.id);
/// ```
pub struct ResourceBay {
    /// Ledger + table + counters.
    state: Mutex<BayState>,
    /// Event collaborator (optional).
    sink: Option<Arc<dyn EventSink>>,
    /// Log collaborator (optional).
    logger: Option<Arc<dyn BayLogger>>,
    /// Notifications not yet delivered.
    dispatch: Mutex<DispatchQueue>,
}

impl Default for ResourceBay {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceBay {
    /// Creates an engine with no resources and no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BayState::default()),
            sink: None,
            logger: None,
            dispatch: Mutex::new(DispatchQueue::default()),
        }
    }

    /// Starts building an engine with collaborators.
    #[must_use]
    pub fn builder() -> ResourceBayBuilder {
        ResourceBayBuilder::default()
    }

    // ========================================================================
    // Resource definition & capacity
    // ========================================================================

    /// Defines a resource, or replaces the capacity of an existing one.
    ///
    /// An existing resource keeps its current allocations, even if the new
    /// capacity is below them.
    ///
    /// # Errors
    ///
    /// Returns `BayError::NegativeCapacity` if `capacity < 0`.
    pub fn define_resource(&self, key: impl Into<ResourceKey>, capacity: i64) -> BayResult<()> {
        let key = key.into();
        self.with_state(|state, outbox| match state.ledger.define(key.clone(), capacity) {
            Ok(previous) => {
                match previous {
                    Some(old) => outbox.info(format!(
                        "resource {key} redefined: capacity {old} -> {capacity}"
                    )),
                    None => outbox.info(format!("resource {key} defined with capacity {capacity}")),
                }
                outbox.event(BayEvent::ResourceDefined { key, capacity });
                Ok(())
            }
            Err(err) => {
                outbox.error(format!("define_resource failed: {err}"));
                Err(err)
            }
        })
    }

    /// Removes a resource.
    ///
    /// Returns `false` if the key is unknown OR still has active allocations.
    /// Both cases look the same; query [`contains`](Self::contains) first to
    /// tell them apart.
    pub fn remove_resource(&self, key: &str) -> bool {
        self.with_state(|state, outbox| {
            let removed = state.ledger.remove(key);
            if removed {
                outbox.info(format!("resource {key} removed"));
                outbox.event(BayEvent::ResourceRemoved {
                    key: ResourceKey::from(key),
                });
            } else {
                outbox.warning(format!(
                    "cannot remove resource {key}: unknown or has active allocations"
                ));
            }
            removed
        })
    }

    /// Replaces the capacity of an existing resource.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if the key is not defined
    /// - `NegativeCapacity` if `capacity < 0`
    pub fn set_capacity(&self, key: &str, capacity: i64) -> BayResult<()> {
        self.with_state(|state, outbox| match state.ledger.set_capacity(key, capacity) {
            Ok(old) => {
                Self::capacity_changed(outbox, key, old, capacity);
                Ok(())
            }
            Err(err) => {
                outbox.error(format!("set_capacity failed: {err}"));
                Err(err)
            }
        })
    }

    /// Adds `delta` (possibly negative) to the capacity of an existing resource.
    ///
    /// # Returns
    ///
    /// The new capacity.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if the key is not defined
    /// - `CapacityOverflow` / `NegativeCapacity` if the result is out of range
    pub fn adjust_capacity(&self, key: &str, delta: i64) -> BayResult<i64> {
        self.with_state(|state, outbox| match state.ledger.adjust_capacity(key, delta) {
            Ok((old, new)) => {
                Self::capacity_changed(outbox, key, old, new);
                Ok(new)
            }
            Err(err) => {
                outbox.error(format!("adjust_capacity failed: {err}"));
                Err(err)
            }
        })
    }

    fn capacity_changed(outbox: &mut Outbox, key: &str, old: i64, new: i64) {
        if old == new {
            return;
        }
        outbox.info(format!("resource {key} capacity {old} -> {new}"));
        outbox.event(BayEvent::CapacityChanged {
            key: ResourceKey::from(key),
            old,
            new,
        });
    }

    /// Checks whether a resource is defined.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().ledger.contains(key)
    }

    /// Gets the capacity of a resource.
    #[must_use]
    pub fn capacity(&self, key: &str) -> Option<i64> {
        self.state.lock().ledger.capacity(key)
    }

    /// Gets the available amount of a resource (negative after a shrink).
    #[must_use]
    pub fn available(&self, key: &str) -> Option<i64> {
        self.state.lock().ledger.available(key)
    }

    /// Gets the allocated total of a resource.
    #[must_use]
    pub fn allocated_total(&self, key: &str) -> Option<i64> {
        self.state.lock().ledger.allocated_total(key)
    }

    /// Checks whether the capacity of a resource is at least `amount`.
    #[must_use]
    pub fn has_capacity(&self, key: &str, amount: i64) -> bool {
        self.state.lock().ledger.has_capacity(key, amount)
    }

    /// Checks whether at least `amount` of a resource is available now.
    #[must_use]
    pub fn has_available(&self, key: &str, amount: i64) -> bool {
        self.state.lock().ledger.has_available(key, amount)
    }

    /// Returns every defined key in byte order.
    #[must_use]
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.state.lock().ledger.keys()
    }

    /// Returns capacity, allocated and available for every resource, taken
    /// as one consistent view.
    #[must_use]
    pub fn totals(&self) -> BTreeMap<ResourceKey, ResourceTotals> {
        self.state.lock().ledger.totals()
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Captures the ledger at this instant.
    #[must_use]
    pub fn snapshot(&self) -> BaySnapshot {
        SnapshotCodec::capture(&self.state.lock().ledger)
    }

    /// Replaces the ledger with a snapshot.
    ///
    /// Keys missing from the snapshot are dropped, keys present are
    /// (re)created with the snapshot capacity, and every allocated total
    /// starts at zero.
    ///
    /// # Returns
    ///
    /// The number of resources defined after the load.
    ///
    /// # Errors
    ///
    /// - `ActiveAllocations` if any allocation is active
    /// - `DuplicateKey` / `NegativeCapacity` if the snapshot is malformed
    ///
    /// State is unchanged on error.
    pub fn load_snapshot(&self, snapshot: &BaySnapshot) -> Result<usize, SnapshotError> {
        self.with_state(|state, outbox| {
            match SnapshotCodec::restore(&mut state.ledger, &state.table, snapshot) {
                Ok(resource_count) => {
                    state.stats.snapshots_loaded += 1;
                    outbox.info(format!("snapshot loaded: {resource_count} resources"));
                    outbox.event(BayEvent::SnapshotLoaded { resource_count });
                    Ok(resource_count)
                }
                Err(err) => {
                    outbox.warning(format!("load_snapshot refused: {err}"));
                    Err(err)
                }
            }
        })
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Requests resources.
    ///
    /// In all-or-nothing mode either every amount is reserved under one new
    /// record, or nothing changes and the error lists every problem. In
    /// best-effort mode the call always succeeds; see [`AllocationRequest`].
    ///
    /// # Errors
    ///
    /// - `EmptyRequest` / `InvalidAmount` for malformed requests (both modes)
    /// - `UnknownResources` if an all-or-nothing request names undefined keys
    /// - `Shortage` if an all-or-nothing request cannot be fully satisfied
    pub fn try_allocate(
        &self,
        request: AllocationRequest,
    ) -> Result<AllocationGrant, AllocationError> {
        self.with_state(|state, outbox| match Self::plan(&state.ledger, &request) {
            Ok(plan) => Ok(Self::commit(state, outbox, request, plan)),
            Err(error) => {
                state.stats.rejections += 1;
                if error.is_configuration_error() {
                    outbox.error(format!("allocation rejected: {error}"));
                } else {
                    outbox.warning(format!("allocation rejected: {error}"));
                }
                outbox.event(BayEvent::AllocationRejected {
                    owner: request.owner_id,
                    requested: request.resources,
                    error: error.to_string(),
                    context: request.context,
                    tags: request.tags,
                });
                Err(error)
            }
        })
    }

    /// Validation pass. Reads the ledger only.
    fn plan(
        ledger: &ResourceLedger,
        request: &AllocationRequest,
    ) -> Result<AllocationPlan, AllocationError> {
        if request.resources.is_empty() {
            return Err(AllocationError::EmptyRequest);
        }

        if let Some((key, amount)) = request.resources.iter().find(|(_, amount)| **amount <= 0) {
            return Err(AllocationError::InvalidAmount {
                key: key.clone(),
                amount: *amount,
            });
        }

        let mut unknown = Vec::new();
        let mut shortages = AmountMap::new();
        let mut granted = AmountMap::new();
        let mut shortfall = AmountMap::new();

        for (key, &amount) in &request.resources {
            let Some(entry) = ledger.get(key.as_str()) else {
                unknown.push(key.clone());
                continue;
            };

            let available = entry.available();
            let shortage = amount.saturating_sub(available);
            if shortage > 0 {
                shortages.insert(key.clone(), shortage);
            }

            let grant = amount.min(available).max(0);
            if grant > 0 {
                granted.insert(key.clone(), grant);
            }
            if grant < amount {
                shortfall.insert(key.clone(), amount - grant);
            }
        }

        if request.all_or_nothing {
            if !unknown.is_empty() {
                return Err(AllocationError::UnknownResources {
                    keys: unknown,
                    shortages,
                });
            }
            if !shortages.is_empty() {
                return Err(AllocationError::Shortage { shortages });
            }
        }

        Ok(AllocationPlan {
            granted,
            shortfall,
            unknown,
        })
    }

    /// Mutation pass. Cannot fail.
    fn commit(
        state: &mut BayState,
        outbox: &mut Outbox,
        request: AllocationRequest,
        plan: AllocationPlan,
    ) -> AllocationGrant {
        let id = AllocationId::generate();
        state.stats.grants += 1;

        if !plan.unknown.is_empty() {
            let names: Vec<&str> = plan.unknown.iter().map(ResourceKey::as_str).collect();
            outbox.error(format!(
                "best-effort allocation {id} skipped unknown resources: {}",
                names.join(", ")
            ));
        }

        if plan.granted.is_empty() {
            outbox.warning(format!("best-effort allocation {id} granted nothing"));
        } else {
            for (key, amount) in &plan.granted {
                state.ledger.reserve(key.as_str(), *amount);
            }

            state.table.insert(AllocationRecord {
                id,
                owner_id: request.owner_id.clone(),
                resources: plan.granted.clone(),
                tags: request.tags.clone(),
                context: request.context.clone(),
                created_at: Utc::now(),
            });

            outbox.info(format!(
                "allocation {id} granted to {}",
                request.owner_id.as_deref().unwrap_or("<none>")
            ));
            outbox.event(BayEvent::AllocationGranted {
                id,
                owner: request.owner_id,
                granted: plan.granted.clone(),
                context: request.context,
                tags: request.tags,
            });
        }

        AllocationGrant {
            id,
            granted: plan.granted,
            shortfall: plan.shortfall,
            unknown: plan.unknown,
        }
    }

    /// Releases an allocation in full.
    ///
    /// Idempotent: an unknown (or already released) ID is a silent no-op
    /// returning `None`.
    pub fn release(&self, id: AllocationId) -> Option<AllocationRecord> {
        self.with_state(|state, outbox| Self::release_locked(state, outbox, id))
    }

    fn release_locked(
        state: &mut BayState,
        outbox: &mut Outbox,
        id: AllocationId,
    ) -> Option<AllocationRecord> {
        let record = state.table.remove(id)?;

        for (key, amount) in &record.resources {
            state.ledger.unreserve(key.as_str(), *amount);
        }
        state.stats.releases += 1;

        outbox.info(format!("allocation {id} released"));
        outbox.event(BayEvent::AllocationReleased {
            id,
            owner: record.owner_id.clone(),
            released: record.resources.clone(),
        });
        Some(record)
    }

    /// Releases part of an allocation.
    ///
    /// Each requested amount is clamped to what the record holds for that
    /// key; non-positive amounts and keys the record does not hold are
    /// ignored. A record that ends up empty is removed, exactly like a full
    /// [`release`](Self::release).
    ///
    /// Returns `None` (no-op) for an unknown ID.
    pub fn release_partial(&self, id: AllocationId, amounts: &AmountMap) -> Option<PartialRelease> {
        self.with_state(|state, outbox| {
            let record = state.table.get_mut(id)?;
            let owner = record.owner_id.clone();
            let mut released = AmountMap::new();

            for (key, &requested) in amounts {
                if requested <= 0 {
                    continue;
                }
                let Some(held) = record.resources.get_mut(key.as_str()) else {
                    continue;
                };

                let amount = requested.min(*held);
                *held -= amount;
                if *held == 0 {
                    record.resources.remove(key.as_str());
                }
                state.ledger.unreserve(key.as_str(), amount);
                released.insert(key.clone(), amount);
            }

            let remaining = record.resources.clone();

            if remaining.is_empty() {
                state.table.remove(id);
                state.stats.releases += 1;
                outbox.info(format!("allocation {id} released (emptied by partial release)"));
                outbox.event(BayEvent::AllocationReleased {
                    id,
                    owner,
                    released: released.clone(),
                });
            } else if !released.is_empty() {
                state.stats.partial_releases += 1;
                outbox.info(format!("allocation {id} partially released"));
                outbox.event(BayEvent::AllocationPartiallyReleased {
                    id,
                    owner,
                    released: released.clone(),
                    remaining: remaining.clone(),
                });
            }

            Some(PartialRelease {
                id,
                released,
                remaining,
            })
        })
    }

    /// Releases every allocation held by an owner.
    ///
    /// Each record is released with full-release semantics and produces its
    /// own `AllocationReleased` event.
    ///
    /// # Returns
    ///
    /// The released records, in ID order.
    pub fn release_by_owner(&self, owner: &str) -> Vec<AllocationRecord> {
        self.with_state(|state, outbox| {
            state
                .table
                .owner_ids(owner)
                .into_iter()
                .filter_map(|id| Self::release_locked(state, outbox, id))
                .collect()
        })
    }

    /// Drops every allocation and zeroes every allocated total.
    ///
    /// Capacities are untouched. Meant for hard resets, not normal flow.
    ///
    /// # Returns
    ///
    /// The number of records cleared.
    pub fn reset_all_allocations(&self) -> usize {
        self.with_state(|state, outbox| {
            let cleared = state.table.len();
            state.table.clear();
            state.ledger.clear_allocations();
            state.stats.resets += 1;

            outbox.warning(format!("all allocations reset ({cleared} records cleared)"));
            outbox.event(BayEvent::AllocationsReset { cleared });
            cleared
        })
    }

    /// Gets a copy of an allocation record.
    #[must_use]
    pub fn allocation(&self, id: AllocationId) -> Option<AllocationRecord> {
        self.state.lock().table.get(id).cloned()
    }

    /// Gets copies of every active record, oldest first.
    #[must_use]
    pub fn allocations(&self) -> Vec<AllocationRecord> {
        let mut records: Vec<AllocationRecord> =
            self.state.lock().table.iter().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }

    /// Gets copies of every record held by an owner, in ID order.
    #[must_use]
    pub fn owner_allocations(&self, owner: &str) -> Vec<AllocationRecord> {
        let state = self.state.lock();
        state
            .table
            .owner_ids(owner)
            .into_iter()
            .filter_map(|id| state.table.get(id).cloned())
            .collect()
    }

    /// Returns the number of active records.
    #[must_use]
    pub fn allocation_count(&self) -> usize {
        self.state.lock().table.len()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Returns operation counters.
    #[must_use]
    pub fn stats(&self) -> BayStats {
        self.state.lock().stats
    }

    /// Recomputes the sum of active records per key and compares it with the
    /// ledger's allocated totals.
    #[must_use]
    pub fn audit(&self) -> LedgerAudit {
        let state = self.state.lock();
        let held = state.table.held_totals();

        let mut discrepancies: Vec<AuditDiscrepancy> = state
            .ledger
            .iter()
            .filter_map(|(key, entry)| {
                let record_total = held.get(key.as_str()).copied().unwrap_or(0);
                (record_total != entry.allocated_total()).then(|| AuditDiscrepancy {
                    key: key.clone(),
                    ledger_total: entry.allocated_total(),
                    record_total,
                })
            })
            .collect();

        // Records holding keys the ledger no longer knows
        discrepancies.extend(
            held.iter()
                .filter(|(key, _)| !state.ledger.contains(key.as_str()))
                .map(|(key, &record_total)| AuditDiscrepancy {
                    key: key.clone(),
                    ledger_total: 0,
                    record_total,
                }),
        );

        LedgerAudit {
            records: state.table.len(),
            discrepancies,
        }
    }

    // ========================================================================
    // Lock + dispatch
    // ========================================================================

    /// Runs `f` under the lock, then dispatches what it queued.
    fn with_state<R>(&self, f: impl FnOnce(&mut BayState, &mut Outbox) -> R) -> R {
        let mut outbox = Outbox::default();
        let result = {
            let mut state = self.state.lock();
            let result = f(&mut *state, &mut outbox);
            // Enqueue before unlocking so queue order is lock order
            if !outbox.is_empty() && (self.sink.is_some() || self.logger.is_some()) {
                self.dispatch.lock().pending.push_back(outbox);
            }
            result
        };
        self.drain_dispatch();
        result
    }

    /// Delivers queued outboxes until the queue is empty.
    ///
    /// Returns at once if another call (on any thread, including an outer
    /// call on this one) is already delivering. The queue lock is never held
    /// while a collaborator runs.
    fn drain_dispatch(&self) {
        {
            let mut queue = self.dispatch.lock();
            if queue.draining || queue.pending.is_empty() {
                return;
            }
            queue.draining = true;
        }

        loop {
            let next = {
                let mut queue = self.dispatch.lock();
                match queue.pending.pop_front() {
                    Some(outbox) => outbox,
                    None => {
                        queue.draining = false;
                        return;
                    }
                }
            };
            self.deliver(&next);
        }
    }

    /// Hands one outbox to the collaborators.
    ///
    /// Must be called without the state lock held. Errors and panics raised
    /// by a collaborator are swallowed here.
    fn deliver(&self, outbox: &Outbox) {
        if let Some(logger) = &self.logger {
            for (level, message) in &outbox.logs {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| match level {
                    LogLevel::Info => logger.info(message),
                    LogLevel::Warning => logger.warning(message),
                    LogLevel::Error => logger.error(message),
                }));
                if outcome.is_err() {
                    tracing::debug!(target: "resource_bay", "logger panicked; message dropped");
                }
            }
        }

        if let Some(sink) = &self.sink {
            for event in &outbox.events {
                match panic::catch_unwind(AssertUnwindSafe(|| sink.publish(event))) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        tracing::debug!(target: "resource_bay", kind = ?event.kind(), %err, "event dropped");
                    }
                    Err(_) => {
                        tracing::debug!(target: "resource_bay", kind = ?event.kind(), "event sink panicked; event dropped");
                    }
                }
            }
        }
    }
}

/// Builder for [`ResourceBay`] with injected collaborators.
#[derive(Default)]
pub struct ResourceBayBuilder {
    sink: Option<Arc<dyn EventSink>>,
    logger: Option<Arc<dyn BayLogger>>,
}

impl ResourceBayBuilder {
    /// Sets the event sink.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the logger.
    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn BayLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> ResourceBay {
        ResourceBay {
            state: Mutex::new(BayState::default()),
            sink: self.sink,
            logger: self.logger,
            dispatch: Mutex::new(DispatchQueue::default()),
        }
    }
}
