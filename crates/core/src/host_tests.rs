// SPDX-License-Identifier: MIT

use super::*;

struct StubHost;

impl HostContext for StubHost {
    fn tick(&self) -> u64 {
        42
    }
    fn cpu_used(&self) -> f64 {
        5.0
    }
    fn cpu_limit(&self) -> f64 {
        20.0
    }
    fn cpu_bucket(&self) -> i64 {
        9000
    }
    fn workers(&self) -> Vec<WorkerView> {
        Vec::new()
    }
    fn rooms(&self) -> Vec<RoomView> {
        Vec::new()
    }
    fn spawns(&self) -> Vec<SpawnView> {
        Vec::new()
    }
}

#[test]
fn default_cpu_snapshot_composes_accessors() {
    let host = StubHost;
    let snap = host.cpu_snapshot();
    assert_eq!(snap.used, 5.0);
    assert_eq!(snap.limit, 20.0);
    assert_eq!(snap.bucket, 9000);
}

#[test]
fn fraction_used_divides_by_limit() {
    let snap = CpuSnapshot {
        used: 9.5,
        limit: 10.0,
        bucket: 0,
    };
    assert!((snap.fraction_used() - 0.95).abs() < f64::EPSILON);
}

#[test]
fn fraction_used_is_zero_for_nonpositive_limit() {
    let snap = CpuSnapshot {
        used: 5.0,
        limit: 0.0,
        bucket: 0,
    };
    assert_eq!(snap.fraction_used(), 0.0);
}

#[test]
fn raw_memory_len_defaults_to_none() {
    assert_eq!(StubHost.raw_memory_len(), None);
}
