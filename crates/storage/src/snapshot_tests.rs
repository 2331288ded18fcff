// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn default_snapshot_has_zeroed_cpu_and_no_warnings() {
    let snap = PerformanceSnapshot::default();
    assert_eq!(snap.cpu.used, 0.0);
    assert!(snap.warnings.is_empty());
}

#[test]
fn field_names_match_spec_shape() {
    let mut snap = PerformanceSnapshot {
        time: 10,
        ..Default::default()
    };
    snap.construction_sites = Some(serde_json::json!([]));
    snap.active_spawns = Some(2);
    let value = serde_json::to_value(&snap).expect("serialize");
    assert!(value.get("constructionSites").is_some());
    assert_eq!(value.get("activeSpawns").and_then(|v| v.as_u64()), Some(2));
    assert!(value.get("construction_sites").is_none());
}

#[test]
fn room_snapshot_camel_cases_fields() {
    let room = RoomSnapshot {
        energy_available: 100,
        energy_capacity_available: 300,
        controller_level: Some(4),
    };
    let value = serde_json::to_value(&room).expect("serialize");
    assert_eq!(value.get("energyAvailable").and_then(|v| v.as_u64()), Some(100));
    assert_eq!(value.get("controllerLevel").and_then(|v| v.as_u64()), Some(4));
}
