//! Allocation requests and the results handed back to callers.

use bay_shared::{AllocationId, AmountMap, ResourceKey};

/// A request for one or more resources.
///
/// ## Modes
///
/// - **All-or-nothing** (default): every key must be defined and fully
///   available, otherwise the request is rejected with no side effects.
/// - **Best-effort** ([`AllocationRequest::best_effort`]): each key is granted
///   independently, `min(requested, available)`, never below zero. The call
///   always succeeds, possibly granting nothing. Useful for throttled
///   consumption where some is better than none.
///
/// ## Example
///
/// ```rust,ignore
/// let request = AllocationRequest::new()
///     .with("water", 40)
///     .with("energy", 5)
///     .with_owner("farm1")
///     .with_context("irrigation");
/// let grant = bay.try_allocate(request)?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Requested amount per resource.
    pub resources: AmountMap,
    /// Reject the whole request if any key cannot be fully satisfied.
    pub all_or_nothing: bool,
    /// Owner recorded on the allocation.
    pub owner_id: Option<String>,
    /// Tags recorded on the allocation.
    pub tags: Vec<String>,
    /// Free-form context recorded on the allocation.
    pub context: Option<String>,
}

impl Default for AllocationRequest {
    fn default() -> Self {
        Self {
            resources: AmountMap::new(),
            all_or_nothing: true,
            owner_id: None,
            tags: Vec::new(),
            context: None,
        }
    }
}

impl AllocationRequest {
    /// Creates an empty all-or-nothing request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an all-or-nothing request for the given amounts.
    #[must_use]
    pub fn from_amounts(resources: AmountMap) -> Self {
        Self {
            resources,
            ..Self::default()
        }
    }

    /// Adds (or replaces) the requested amount of a resource.
    #[must_use]
    pub fn with(mut self, key: impl Into<ResourceKey>, amount: i64) -> Self {
        self.resources.insert(key.into(), amount);
        self
    }

    /// Switches the request to best-effort mode.
    #[must_use]
    pub const fn best_effort(mut self) -> Self {
        self.all_or_nothing = false;
        self
    }

    /// Sets the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner_id = Some(owner.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Replaces all tags.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Result of a successful [`try_allocate`](crate::ResourceBay::try_allocate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationGrant {
    /// Identifier of the allocation record.
    ///
    /// A best-effort grant that obtained nothing retains no record; releasing
    /// this ID is then a no-op.
    pub id: AllocationId,
    /// Amount granted per resource. Keys with nothing granted are omitted.
    pub granted: AmountMap,
    /// Best-effort only: amount requested but not granted, per defined key.
    pub shortfall: AmountMap,
    /// Best-effort only: requested keys that are not defined.
    pub unknown: Vec<ResourceKey>,
}

impl AllocationGrant {
    /// Returns true if an allocation record was created.
    #[inline]
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        !self.granted.is_empty()
    }

    /// Returns true if everything requested was granted.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfall.is_empty() && self.unknown.is_empty()
    }
}

/// Outcome of a partial release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialRelease {
    /// The allocation.
    pub id: AllocationId,
    /// Amounts released by this call (clamped to what was held).
    pub released: AmountMap,
    /// Amounts still held. Empty once the record has been closed.
    pub remaining: AmountMap,
}

impl PartialRelease {
    /// Returns true if the release emptied and removed the record.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_all_or_nothing() {
        let request = AllocationRequest::new()
            .with("water", 40)
            .with("energy", 5)
            .with_owner("farm1")
            .with_tag("irrigation")
            .with_context("tick 12");

        assert!(request.all_or_nothing);
        assert_eq!(request.resources.len(), 2);
        assert_eq!(request.owner_id.as_deref(), Some("farm1"));
        assert_eq!(request.tags, vec!["irrigation".to_string()]);
        assert_eq!(request.context.as_deref(), Some("tick 12"));
    }

    #[test]
    fn test_best_effort_and_tags() {
        let request = AllocationRequest::new()
            .with("water", 1)
            .best_effort()
            .with_tags(["a", "b"]);

        assert!(!request.all_or_nothing);
        assert_eq!(request.tags.len(), 2);
    }

    #[test]
    fn test_grant_flags() {
        let grant = AllocationGrant {
            id: AllocationId::generate(),
            granted: AmountMap::new(),
            shortfall: AmountMap::new(),
            unknown: vec![ResourceKey::from("mana")],
        };
        assert!(!grant.is_recorded());
        assert!(!grant.is_complete());
    }
}
