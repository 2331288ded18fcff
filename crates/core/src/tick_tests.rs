// SPDX-License-Identifier: MIT

use super::*;
use crate::host::HostContext;

struct StubHost {
    tick: u64,
    used: f64,
    limit: f64,
}

impl HostContext for StubHost {
    fn tick(&self) -> u64 {
        self.tick
    }
    fn cpu_used(&self) -> f64 {
        self.used
    }
    fn cpu_limit(&self) -> f64 {
        self.limit
    }
    fn cpu_bucket(&self) -> i64 {
        0
    }
    fn workers(&self) -> Vec<WorkerView> {
        vec![WorkerView {
            id: "w1".into(),
            role: "harvester".into(),
            room_id: Some("W1N1".into()),
        }]
    }
    fn rooms(&self) -> Vec<RoomView> {
        Vec::new()
    }
    fn spawns(&self) -> Vec<SpawnView> {
        Vec::new()
    }
}

#[test]
fn assemble_captures_all_fields() {
    let host = StubHost {
        tick: 7,
        used: 1.0,
        limit: 10.0,
    };
    let ctx = TickContext::assemble(&host);
    assert_eq!(ctx.tick, 7);
    assert_eq!(ctx.workers().len(), 1);
    assert_eq!(ctx.workers()[0].role, "harvester");
}

#[test]
fn cpu_emergency_respects_threshold() {
    let host = StubHost {
        tick: 1,
        used: 9.5,
        limit: 10.0,
    };
    let ctx = TickContext::assemble(&host);
    assert!(ctx.cpu_emergency(0.9));
    assert!(!ctx.cpu_emergency(0.96));
}
