// SPDX-License-Identifier: MIT

use super::*;
use crate::protocol::ProtocolRegistry;
use hive_host::FakeHostContext;
use hive_storage::DurableRoot;

fn tick(host: &FakeHostContext) -> TickContext {
    TickContext::assemble(host)
}

#[test]
fn processes_run_in_priority_then_registration_order() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let tc = tick(&host);
    let mut root = DurableRoot::default();
    let mut protocols = ProtocolRegistry::with_standard_protocols();
    let mut registry = ProcessRegistry::new();

    let order = std::rc::Rc::new(std::cell::RefCell::new(Vec::<&'static str>::new()));
    let order_a = order.clone();
    let order_b = order.clone();
    let order_c = order.clone();

    registry
        .register(
            "second",
            1,
            false,
            Box::new(move |_cx: &mut ProcessCx<'_>| {
                order_b.borrow_mut().push("second");
                Ok(ProcessOutcome::empty())
            }),
        )
        .expect("register");
    registry
        .register(
            "first",
            0,
            false,
            Box::new(move |_cx: &mut ProcessCx<'_>| {
                order_a.borrow_mut().push("first");
                Ok(ProcessOutcome::empty())
            }),
        )
        .expect("register");
    registry
        .register(
            "third",
            1,
            false,
            Box::new(move |_cx: &mut ProcessCx<'_>| {
                order_c.borrow_mut().push("third");
                Ok(ProcessOutcome::empty())
            }),
        )
        .expect("register");

    registry.run(&host, &tc, &mut root, &mut protocols, 0.9);
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn duplicate_name_is_rejected_unless_singleton() {
    let mut registry = ProcessRegistry::new();
    registry
        .register("p", 0, false, Box::new(|_cx: &mut ProcessCx<'_>| Ok(ProcessOutcome::empty())))
        .expect("register");
    let result = registry.register("p", 0, false, Box::new(|_cx: &mut ProcessCx<'_>| Ok(ProcessOutcome::empty())));
    assert!(matches!(result, Err(KernelError::DuplicateName(_))));

    let result = registry.register("p", 5, true, Box::new(|_cx: &mut ProcessCx<'_>| Ok(ProcessOutcome::empty())));
    assert!(result.is_ok());
    assert_eq!(registry.len(), 1);
}

#[test]
fn run_skips_everything_above_the_emergency_threshold() {
    let host = FakeHostContext::new().with_cpu(19.5, 20.0, 9000);
    let tc = tick(&host);
    let mut root = DurableRoot::default();
    let mut protocols = ProtocolRegistry::with_standard_protocols();
    let mut registry = ProcessRegistry::new();
    let ran = std::rc::Rc::new(std::cell::Cell::new(false));
    let ran2 = ran.clone();
    registry
        .register(
            "p",
            0,
            false,
            Box::new(move |_cx: &mut ProcessCx<'_>| {
                ran2.set(true);
                Ok(ProcessOutcome::empty())
            }),
        )
        .expect("register");

    let report = registry.run(&host, &tc, &mut root, &mut protocols, 0.9);
    assert!(report.emergency_triggered);
    assert!(!ran.get());
}

#[test]
fn run_skips_remaining_processes_once_the_live_budget_is_exhausted() {
    // `cpu_used` is read live from the host, not the frozen tick snapshot, so
    // a process that spends the whole budget blocks everything after it in
    // the same pass (spec.md §4.1 step 6's live per-process guard).
    let host = std::rc::Rc::new(FakeHostContext::new().with_cpu(0.0, 20.0, 9000));
    let tc = tick(&host);
    let mut root = DurableRoot::default();
    let mut protocols = ProtocolRegistry::with_standard_protocols();
    let mut registry = ProcessRegistry::new();

    let spender_host = host.clone();
    registry
        .register(
            "spender",
            0,
            false,
            Box::new(move |_cx: &mut ProcessCx<'_>| {
                spender_host.set_cpu_used(20.0);
                Ok(ProcessOutcome::empty())
            }),
        )
        .expect("register");
    registry
        .register("never-runs", 1, false, Box::new(|_cx: &mut ProcessCx<'_>| Ok(ProcessOutcome::empty())))
        .expect("register");

    let report = registry.run(host.as_ref(), &tc, &mut root, &mut protocols, 0.9);
    assert_eq!(report.budget_skips, vec!["never-runs"]);
}

#[test]
fn a_faulting_process_is_captured_without_aborting_the_pass() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let tc = tick(&host);
    let mut root = DurableRoot::default();
    let mut protocols = ProtocolRegistry::with_standard_protocols();
    let mut registry = ProcessRegistry::new();

    registry
        .register(
            "faulty",
            0,
            false,
            Box::new(|_cx: &mut ProcessCx<'_>| Err(ProcessError::new("panic", "boom"))),
        )
        .expect("register");
    registry
        .register(
            "healthy",
            1,
            false,
            Box::new(|_cx: &mut ProcessCx<'_>| Ok(ProcessOutcome::with_summary(serde_json::json!({"ok": true})))),
        )
        .expect("register");

    let report = registry.run(&host, &tc, &mut root, &mut protocols, 0.9);
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].0, "faulty");
    assert_eq!(report.summaries.len(), 1);
}
