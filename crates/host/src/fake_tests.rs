// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn defaults_are_a_healthy_idle_host() {
    let host = FakeHostContext::new();
    assert_eq!(host.tick(), 0);
    assert_eq!(host.cpu_used(), 0.0);
    assert!(host.workers().is_empty());
    assert_eq!(host.raw_memory_len(), None);
}

#[test]
fn builder_methods_set_every_field() {
    let host = FakeHostContext::new()
        .with_tick(5)
        .with_cpu(3.0, 20.0, 9000)
        .with_workers(vec![WorkerView {
            id: "w1".into(),
            role: "harvester".into(),
            room_id: Some("W1N1".into()),
        }])
        .with_rooms(vec![RoomView {
            id: "W1N1".into(),
            energy_available: 100,
            energy_capacity_available: 300,
            controller_level: Some(2),
        }])
        .with_spawns(vec![SpawnView {
            id: "spawn1".into(),
            room_id: Some("W1N1".into()),
            spawning: false,
        }])
        .with_raw_memory_len(128);

    assert_eq!(host.tick(), 5);
    assert_eq!(host.cpu_used(), 3.0);
    assert_eq!(host.cpu_limit(), 20.0);
    assert_eq!(host.cpu_bucket(), 9000);
    assert_eq!(host.workers().len(), 1);
    assert_eq!(host.rooms().len(), 1);
    assert_eq!(host.spawns().len(), 1);
    assert_eq!(host.raw_memory_len(), Some(128));
}

#[test]
fn advance_tick_increments_and_resets_cpu() {
    let host = FakeHostContext::new().with_tick(1).with_cpu(15.0, 20.0, 9000);
    host.advance_tick();
    assert_eq!(host.tick(), 2);
    assert_eq!(host.cpu_used(), 0.0);
}

#[test]
fn spend_cpu_accumulates() {
    let host = FakeHostContext::new();
    host.spend_cpu(2.0);
    host.spend_cpu(3.5);
    assert_eq!(host.cpu_used(), 5.5);
}

#[test]
fn set_cpu_used_overwrites() {
    let host = FakeHostContext::new();
    host.spend_cpu(2.0);
    host.set_cpu_used(9.0);
    assert_eq!(host.cpu_used(), 9.0);
}
