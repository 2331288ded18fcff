// SPDX-License-Identifier: MIT

use super::*;
use hive_host::FakeHostContext;
use std::cell::RefCell;
use std::rc::Rc;

fn phase(name: &str, priority: i32, cpu_estimate: f64, order: Rc<RefCell<Vec<String>>>) -> InitPhase {
    let name_owned = name.to_string();
    InitPhase::new(name, priority, cpu_estimate, move |_tick, _root| {
        order.borrow_mut().push(name_owned.clone());
        Ok(())
    })
}

#[test]
fn an_empty_phase_list_completes_immediately() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();

    let outcome = manager.tick(&host, &tick, &mut root, &KernelConfig::default());
    assert!(outcome.complete);
    assert!(manager.is_complete());
}

#[test]
fn phases_run_in_priority_then_registration_order() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    manager.register_phase(phase("second", 1, 1.0, order.clone()));
    manager.register_phase(phase("first", 0, 1.0, order.clone()));
    manager.register_phase(phase("third", 1, 1.0, order.clone()));

    let outcome = manager.tick(&host, &tick, &mut root, &KernelConfig::default());
    assert!(outcome.complete);
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn a_phase_is_skipped_when_the_safety_margin_is_exceeded() {
    let host = FakeHostContext::new().with_cpu(15.0, 20.0, 9000);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    manager.register_phase(phase("expensive", 0, 5.0, order.clone()));

    let config = KernelConfig {
        init_safety_margin: 0.7,
        max_init_ticks: 10,
        ..KernelConfig::default()
    };
    let outcome = manager.tick(&host, &tick, &mut root, &config);
    assert!(!outcome.complete);
    assert!(order.borrow().is_empty());
}

#[test]
fn scenario_insufficient_bucket_blocks_every_phase_this_tick() {
    // spec.md §8 scenario 6: min_bucket_level=500, bucket=300, two phases
    // with cpu_estimate=2 each -> {complete: false}, zero phases executed.
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 300);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    manager.register_phase(phase("a", 0, 2.0, order.clone()));
    manager.register_phase(phase("b", 1, 2.0, order.clone()));

    let config = KernelConfig {
        init_min_bucket_level: 500,
        max_init_ticks: 10,
        ..KernelConfig::default()
    };
    let outcome = manager.tick(&host, &tick, &mut root, &config);
    assert!(!outcome.complete);
    assert!(order.borrow().is_empty());
}

#[test]
fn phases_are_force_run_after_max_init_ticks_regardless_of_budget() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 100);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    manager.register_phase(phase("blocked", 0, 50.0, order.clone()));

    let config = KernelConfig {
        init_min_bucket_level: 10_000,
        max_init_ticks: 2,
        ..KernelConfig::default()
    };
    let tick = TickContext::assemble(&host);
    assert!(!manager.tick(&host, &tick, &mut root, &config).complete);
    assert!(order.borrow().is_empty());

    let outcome = manager.tick(&host, &tick, &mut root, &config);
    assert!(outcome.complete);
    assert_eq!(*order.borrow(), vec!["blocked"]);
}

#[test]
fn a_completed_phase_does_not_run_again_on_a_later_tick() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let tick = TickContext::assemble(&host);
    let mut root = DurableRoot::default();
    let mut manager = InitializationManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    manager.register_phase(phase("once", 0, 1.0, order.clone()));

    manager.tick(&host, &tick, &mut root, &KernelConfig::default());
    manager.tick(&host, &tick, &mut root, &KernelConfig::default());
    assert_eq!(*order.borrow(), vec!["once"]);
}
