// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-storage: the persistence boundary around `DurableRoot`.
//!
//! The host hands the kernel one opaque, serializable value each tick
//! (spec.md §1, §3) and takes it back at tick end. This crate owns that
//! boundary: [`DurableRoot`] wraps the value, repairs its reserved fields,
//! and exposes them through typed accessors rather than free-form field
//! writes (spec.md §9's "re-architecting source patterns").

pub mod durable_root;
pub mod error;
pub mod fields;
pub mod migration;
pub mod profiler;
pub mod snapshot;

pub use durable_root::DurableRoot;
pub use error::StorageError;
pub use profiler::{retain_top_entries, retention_due, ProfilerEntry, ProfilerState};
pub use snapshot::{CreepSnapshot, PerformanceSnapshot, RoomSnapshot, RoomsSnapshot, SpawnOrders};
