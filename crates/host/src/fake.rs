// SPDX-License-Identifier: MIT

//! In-memory, builder-style [`hive_core::HostContext`] double.

use hive_core::{HostContext, RoomView, SpawnView, WorkerView};
use std::cell::RefCell;

struct FakeState {
    tick: u64,
    cpu_used: f64,
    cpu_limit: f64,
    cpu_bucket: i64,
    workers: Vec<WorkerView>,
    rooms: Vec<RoomView>,
    spawns: Vec<SpawnView>,
    raw_memory_len: Option<usize>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            tick: 0,
            cpu_used: 0.0,
            cpu_limit: 20.0,
            cpu_bucket: 10_000,
            workers: Vec::new(),
            rooms: Vec::new(),
            spawns: Vec::new(),
            raw_memory_len: None,
        }
    }
}

/// A fully in-memory host whose ambient globals are set up by the test and
/// can be mutated between `run_tick` calls to simulate the passage of
/// ticks. Interior mutability mirrors the actual host: `HostContext`
/// methods take `&self`, but the underlying values change tick to tick.
#[derive(Default)]
pub struct FakeHostContext {
    state: RefCell<FakeState>,
}

impl FakeHostContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick(self, tick: u64) -> Self {
        self.state.borrow_mut().tick = tick;
        self
    }

    pub fn with_cpu(self, used: f64, limit: f64, bucket: i64) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.cpu_used = used;
            state.cpu_limit = limit;
            state.cpu_bucket = bucket;
        }
        self
    }

    pub fn with_workers(self, workers: Vec<WorkerView>) -> Self {
        self.state.borrow_mut().workers = workers;
        self
    }

    pub fn with_rooms(self, rooms: Vec<RoomView>) -> Self {
        self.state.borrow_mut().rooms = rooms;
        self
    }

    pub fn with_spawns(self, spawns: Vec<SpawnView>) -> Self {
        self.state.borrow_mut().spawns = spawns;
        self
    }

    pub fn with_raw_memory_len(self, len: usize) -> Self {
        self.state.borrow_mut().raw_memory_len = Some(len);
        self
    }

    /// Advance to the next tick, resetting `cpu_used` to zero as a real
    /// host does at tick entry.
    pub fn advance_tick(&self) {
        let mut state = self.state.borrow_mut();
        state.tick += 1;
        state.cpu_used = 0.0;
    }

    /// Simulates CPU consumed by whatever the kernel just ran, for tests
    /// that assert on the live per-process budget guard.
    pub fn spend_cpu(&self, amount: f64) {
        self.state.borrow_mut().cpu_used += amount;
    }

    pub fn set_cpu_used(&self, amount: f64) {
        self.state.borrow_mut().cpu_used = amount;
    }

    pub fn set_bucket(&self, bucket: i64) {
        self.state.borrow_mut().cpu_bucket = bucket;
    }

    pub fn set_workers(&self, workers: Vec<WorkerView>) {
        self.state.borrow_mut().workers = workers;
    }

    pub fn set_rooms(&self, rooms: Vec<RoomView>) {
        self.state.borrow_mut().rooms = rooms;
    }

    pub fn set_spawns(&self, spawns: Vec<SpawnView>) {
        self.state.borrow_mut().spawns = spawns;
    }
}

impl HostContext for FakeHostContext {
    fn tick(&self) -> u64 {
        self.state.borrow().tick
    }

    fn cpu_used(&self) -> f64 {
        self.state.borrow().cpu_used
    }

    fn cpu_limit(&self) -> f64 {
        self.state.borrow().cpu_limit
    }

    fn cpu_bucket(&self) -> i64 {
        self.state.borrow().cpu_bucket
    }

    fn workers(&self) -> Vec<WorkerView> {
        self.state.borrow().workers.clone()
    }

    fn rooms(&self) -> Vec<RoomView> {
        self.state.borrow().rooms.clone()
    }

    fn spawns(&self) -> Vec<SpawnView> {
        self.state.borrow().spawns.clone()
    }

    fn raw_memory_len(&self) -> Option<usize> {
        self.state.borrow().raw_memory_len
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
