// SPDX-License-Identifier: MIT

//! The per-tick immutable view assembled at kernel entry (spec.md §3).

use crate::host::{CpuSnapshot, HostContext, RoomView, SpawnView, WorkerView};

/// An immutable view of the current tick, assembled once from
/// [`HostContext`] and handed by reference to every process, task, and
/// state machine invoked during the tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub tick: u64,
    pub cpu: CpuSnapshot,
    workers: Vec<WorkerView>,
    rooms: Vec<RoomView>,
    spawns: Vec<SpawnView>,
    raw_memory_len: Option<usize>,
}

impl TickContext {
    /// Assemble the frozen, once-per-tick `TickContext` snapshot from a
    /// host. Most of the kernel reads from this snapshot rather than the
    /// host directly; the CPU budget guards are the exception, re-querying
    /// `HostContext::cpu_used()` live as processes and tasks run so a
    /// mid-tick process can't blow through the limit before the next
    /// snapshot catches it.
    pub fn assemble(host: &dyn HostContext) -> Self {
        Self {
            tick: host.tick(),
            cpu: host.cpu_snapshot(),
            workers: host.workers(),
            rooms: host.rooms(),
            spawns: host.spawns(),
            raw_memory_len: host.raw_memory_len(),
        }
    }

    pub fn workers(&self) -> &[WorkerView] {
        &self.workers
    }

    pub fn rooms(&self) -> &[RoomView] {
        &self.rooms
    }

    pub fn spawns(&self) -> &[SpawnView] {
        &self.spawns
    }

    pub fn raw_memory_len(&self) -> Option<usize> {
        self.raw_memory_len
    }

    /// True when `cpu.used() / cpu.limit` exceeds `threshold` (spec.md §4.1,
    /// §8 property 6).
    pub fn cpu_emergency(&self, threshold: f64) -> bool {
        self.cpu.fraction_used() > threshold
    }
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
