// SPDX-License-Identifier: MIT

//! `PerformanceSnapshot`: the shape of `DurableRoot.stats` (spec.md §3, §6).

use hive_core::CpuSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The per-tick performance and telemetry record. `StatsCollector` (in
/// `hive-kernel`) is the sole writer; every other component reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub time: u64,
    pub cpu: CpuSnapshot,
    pub creeps: CreepSnapshot,
    pub rooms: RoomsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structures: Option<serde_json::Value>,
    #[serde(rename = "constructionSites", skip_serializing_if = "Option::is_none")]
    pub construction_sites: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawns: Option<serde_json::Value>,
    #[serde(rename = "activeSpawns", skip_serializing_if = "Option::is_none")]
    pub active_spawns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn: Option<SpawnOrders>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreepSnapshot {
    pub count: u32,
    #[serde(rename = "byRole", skip_serializing_if = "Option::is_none")]
    pub by_role: Option<HashMap<String, u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomsSnapshot {
    pub count: u32,
    #[serde(rename = "perRoom", default, skip_serializing_if = "HashMap::is_empty")]
    pub per_room: HashMap<String, RoomSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    #[serde(rename = "energyAvailable")]
    pub energy_available: u32,
    #[serde(rename = "energyCapacityAvailable")]
    pub energy_capacity_available: u32,
    #[serde(rename = "controllerLevel", skip_serializing_if = "Option::is_none")]
    pub controller_level: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnOrders {
    pub orders: Vec<String>,
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
