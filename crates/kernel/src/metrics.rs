// SPDX-License-Identifier: MIT

//! Builds the end-of-tick `PerformanceSnapshot` (spec.md §2 step 7, §4.1
//! step 7: "StatsCollector is the sole owner of this field").

use hive_core::TickContext;
use hive_storage::{CreepSnapshot, PerformanceSnapshot, RoomSnapshot, RoomsSnapshot, SpawnOrders};
use std::collections::HashMap;

/// Everything the evaluator needs to assemble one tick's snapshot. Built up
/// by the kernel as each phase of the tick runs; guaranteed to be turned
/// into a snapshot even when earlier phases aborted (spec.md §2 step 7:
/// "guaranteed to run even when earlier phases abort").
#[derive(Debug, Default)]
pub struct SnapshotInputs {
    pub role_counts: Option<HashMap<String, u32>>,
    pub structures: Option<serde_json::Value>,
    pub construction_sites: Option<serde_json::Value>,
    pub health: Option<serde_json::Value>,
    pub spawn_orders: Option<Vec<String>>,
    pub warnings: Vec<String>,
}

pub fn build_snapshot(tick: &TickContext, inputs: SnapshotInputs) -> PerformanceSnapshot {
    let per_room = tick
        .rooms()
        .iter()
        .map(|room| {
            (
                room.id.clone(),
                RoomSnapshot {
                    energy_available: room.energy_available,
                    energy_capacity_available: room.energy_capacity_available,
                    controller_level: room.controller_level,
                },
            )
        })
        .collect();

    PerformanceSnapshot {
        time: tick.tick,
        cpu: tick.cpu,
        creeps: CreepSnapshot {
            count: tick.workers().len() as u32,
            by_role: inputs.role_counts,
        },
        rooms: RoomsSnapshot {
            count: tick.rooms().len() as u32,
            per_room,
        },
        structures: inputs.structures,
        construction_sites: inputs.construction_sites,
        spawns: None,
        active_spawns: Some(tick.spawns().iter().filter(|spawn| spawn.spawning).count() as u32),
        health: inputs.health,
        spawn: inputs.spawn_orders.map(|orders| SpawnOrders { orders }),
        warnings: inputs.warnings,
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
