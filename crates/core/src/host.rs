// SPDX-License-Identifier: MIT

//! The `HostContext` trait: the kernel's only window onto the host's
//! ambient globals (spec.md §6's `Game`, `Memory`, `RawMemory`).
//!
//! Domain-specific bindings (a real Screeps adapter, for instance) are
//! consumers of this trait and out of scope for this crate (spec.md §1).
//! Tests and the sandbox binary drive the kernel through
//! `hive_host::FakeHostContext`.

use serde::{Deserialize, Serialize};

/// A read-only snapshot of the host's CPU meter, captured once at tick
/// entry. `spec.md` §9 treats `cpu.used()` as monotonic non-decreasing
/// within a tick; capturing it once keeps every consumer's view
/// consistent even if the host violates that assumption mid-tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub used: f64,
    pub limit: f64,
    pub bucket: i64,
}

impl CpuSnapshot {
    /// Fraction of `limit` currently used, in `[0, +inf)`.
    pub fn fraction_used(&self) -> f64 {
        if self.limit <= 0.0 {
            0.0
        } else {
            self.used / self.limit
        }
    }
}

/// Minimal view of a worker (creep) the kernel needs: enough to prune
/// stale per-worker memory and build role counts (spec.md §4.1 steps 4-5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerView {
    pub id: String,
    pub role: String,
    pub room_id: Option<String>,
}

/// Minimal view of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: String,
    pub energy_available: u32,
    pub energy_capacity_available: u32,
    pub controller_level: Option<u8>,
}

/// Minimal view of a spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnView {
    pub id: String,
    pub room_id: Option<String>,
    pub spawning: bool,
}

/// Abstraction over the host's per-tick ambient globals.
///
/// Implementations must be cheap to query repeatedly within a tick.
/// [`TickContext`] assembly reads every method once to build the tick's
/// frozen snapshot, but `cpu_used()` is also re-queried live afterward by
/// the process scheduler and task runner as a running CPU budget guard —
/// a mid-tick process can push the host's live counter past `cpu_limit`
/// well before the next snapshot would notice.
///
/// [`TickContext`]: crate::tick::TickContext
pub trait HostContext {
    /// The current tick number.
    fn tick(&self) -> u64;

    /// CPU time used so far this tick, as reported by the host.
    fn cpu_used(&self) -> f64;

    /// The host's configured CPU limit for one tick.
    fn cpu_limit(&self) -> f64;

    /// The host's banked CPU bucket.
    fn cpu_bucket(&self) -> i64;

    /// All live workers visible to the bot this tick.
    fn workers(&self) -> Vec<WorkerView>;

    /// All rooms visible to the bot this tick.
    fn rooms(&self) -> Vec<RoomView>;

    /// All spawns visible to the bot this tick.
    fn spawns(&self) -> Vec<SpawnView>;

    /// Byte length of the raw serialized memory blob, if the host exposes
    /// `RawMemory` (spec.md §6). `None` when unavailable.
    fn raw_memory_len(&self) -> Option<usize> {
        None
    }

    /// Snapshot the CPU meter once. Default impl composes the three
    /// required accessors; hosts are free to override if they can produce
    /// a single atomic read.
    fn cpu_snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            used: self.cpu_used(),
            limit: self.cpu_limit(),
            bucket: self.cpu_bucket(),
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
