// SPDX-License-Identifier: MIT

use super::*;
use hive_host::FakeHostContext;

#[test]
fn cpu_used_this_step_measures_delta_since_construction() {
    let host = FakeHostContext::new().with_cpu(2.0, 20.0, 9000);
    let cx = StepCx::new(1, &host);
    host.spend_cpu(1.5);
    assert!((cx.cpu_used_this_step() - 1.5).abs() < f64::EPSILON);
}

#[test]
fn new_captures_tick_number() {
    let host = FakeHostContext::new();
    let cx = StepCx::new(42, &host);
    assert_eq!(cx.tick, 42);
}
