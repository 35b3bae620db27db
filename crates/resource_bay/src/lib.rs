//! # Resource Bay
//!
//! Thread-safe allocation engine for named, capacity-limited resources.
//!
//! ## Design Principles
//!
//! 1. **One lock** - The ledger and the allocation table change together or not at all
//! 2. **Validate, then mutate** - A rejected request never touches state
//! 3. **Full diagnostics** - Rejections list every shortage and every unknown key
//! 4. **Quiet collaborators** - Event sinks and loggers run outside the lock and
//!    their failures never reach the caller
//!
//! ## Invariant
//!
//! For every resource, the ledger's allocated total equals the sum of the
//! amounts held by active allocation records. [`ResourceBay::audit`] checks it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use resource_bay::{AllocationRequest, ResourceBay};
//!
//! let bay = ResourceBay::new();
//! bay.define_resource("water", 100)?;
//! bay.define_resource("energy", 50)?;
//!
//! let grant = bay.try_allocate(
//!     AllocationRequest::new()
//!         .with("water", 40)
//!         .with("energy", 10)
//!         .with_owner("farm1"),
//! )?;
//!
//! bay.release(grant.id);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod request;
pub mod snapshot;
pub mod table;
pub mod telemetry;

pub use bus::{EventBus, EventReceiver, EventSender, DEFAULT_EVENT_CAPACITY};
pub use config::{BayConfig, EventsConfig, LoggingConfig, ResourceConfig};
pub use engine::{AuditDiscrepancy, BayStats, LedgerAudit, ResourceBay, ResourceBayBuilder};
pub use error::{AllocationError, BayError, BayResult, ConfigError, SinkError, SnapshotError};
pub use ledger::{ResourceEntry, ResourceLedger, ResourceTotals};
pub use request::{AllocationGrant, AllocationRequest, PartialRelease};
pub use snapshot::SnapshotCodec;
pub use table::{AllocationRecord, AllocationTable};
pub use telemetry::{BayLogger, BufferedSink, EventSink, LogLevel, TracingLogger};

pub use bay_shared::{
    amount_map, AllocationId, AmountMap, BayEvent, BayEventKind, BaySnapshot, ResourceKey,
    SnapshotEntry,
};
