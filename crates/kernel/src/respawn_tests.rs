// SPDX-License-Identifier: MIT

use super::*;
use hive_core::SpawnView;
use hive_host::FakeHostContext;

fn spawn(id: &str) -> SpawnView {
    SpawnView {
        id: id.to_string(),
        room_id: Some("W1N1".to_string()),
        spawning: false,
    }
}

#[test]
fn a_truly_fresh_world_is_detected() {
    let host = FakeHostContext::new().with_spawns(vec![spawn("spawn1")]);
    let tick = TickContext::assemble(&host);
    let root = DurableRoot::default();
    assert!(detect_fresh_world(&root, &tick));
}

#[test]
fn reserved_slots_already_populated_means_not_fresh() {
    let host = FakeHostContext::new().with_spawns(vec![spawn("spawn1")]);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    root.set(fields::TASKS, &serde_json::json!({"t1": {}})).expect("set tasks");
    assert!(!detect_fresh_world(&root, &tick));
}

#[test]
fn live_workers_mean_not_fresh() {
    let host = FakeHostContext::new()
        .with_spawns(vec![spawn("spawn1")])
        .with_workers(vec![hive_core::WorkerView {
            id: "worker-1".to_string(),
            role: "harvester".to_string(),
            room_id: Some("W1N1".to_string()),
        }]);
    let tick = TickContext::assemble(&host);
    let root = DurableRoot::default();
    assert!(!detect_fresh_world(&root, &tick));
}

#[test]
fn zero_spawns_is_a_map_edge_case_not_a_reset() {
    let host = FakeHostContext::new();
    let tick = TickContext::assemble(&host);
    let root = DurableRoot::default();
    assert!(!detect_fresh_world(&root, &tick));
}

#[test]
fn a_roles_slot_repaired_to_an_empty_object_still_counts_as_empty() {
    let host = FakeHostContext::new().with_spawns(vec![spawn("spawn1")]);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    root.ensure_reserved_fields();
    assert!(detect_fresh_world(&root, &tick));
}
