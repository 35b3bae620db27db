//! # Bay Shared
//!
//! Common types used by the Resource Bay engine and everything that talks to it.
//!
//! ## Contents
//!
//! - [`ResourceKey`] / [`AllocationId`]: the two identifiers of the ledger
//! - [`BayEvent`]: payloads published after every state change
//! - [`BaySnapshot`]: the persisted ledger schema
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER contain allocation logic. Subscribers and save/load
//! tooling depend on it without linking the engine.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod events;
pub mod ids;
pub mod snapshot;

pub use events::{BayEvent, BayEventKind};
pub use ids::{amount_map, AllocationId, AmountMap, ResourceKey};
pub use snapshot::{BaySnapshot, SnapshotEntry};
