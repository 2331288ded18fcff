// SPDX-License-Identifier: MIT

use super::*;
use crate::task::combinators::{wait_ticks, wait_until};
use hive_host::FakeHostContext;

fn id(s: &str) -> TaskId {
    TaskId::new(s)
}

#[test]
fn create_then_run_advances_to_completion() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(1), TaskOptions::default(), 1).expect("create");

    let report = runner.run(&host, 1, 20.0, 64);
    assert_eq!(report.advanced, 1);
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Completed));
    assert_eq!(report.completed, vec![id("t1")]);
}

#[test]
fn create_rejects_duplicate_nonterminal_id() {
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(5), TaskOptions::default(), 1).expect("create");
    let result = runner.create(id("t1"), wait_ticks(5), TaskOptions::default(), 1);
    assert!(matches!(result, Err(KernelError::DuplicateTaskId(_))));
}

#[test]
fn create_allows_reuse_of_a_terminal_id() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(0), TaskOptions::default(), 1).expect("create");
    runner.run(&host, 1, 20.0, 64);
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Completed));

    let result = runner.create(id("t1"), wait_ticks(1), TaskOptions::default(), 2);
    assert!(result.is_ok());
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Pending));
}

#[test]
fn cancel_marks_cancelled_with_a_reason() {
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(5), TaskOptions::default(), 1).expect("create");
    runner.cancel(&id("t1"), "superseded", 2);
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Cancelled));
    assert_eq!(runner.error(&id("t1")), Some("superseded"));
}

#[test]
fn run_respects_priority_order() {
    let mut runner = TaskRunner::new();
    runner
        .create(
            id("low"),
            wait_ticks(0),
            TaskOptions {
                priority: 0,
                ..TaskOptions::default()
            },
            1,
        )
        .expect("create low");
    runner
        .create(
            id("high"),
            wait_ticks(0),
            TaskOptions {
                priority: 10,
                ..TaskOptions::default()
            },
            1,
        )
        .expect("create high");

    let order = runner.runnable_order();
    assert_eq!(order, vec![id("high"), id("low")]);
}

#[test]
fn run_stops_at_the_per_tick_quota() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(5), TaskOptions::default(), 1).expect("create t1");
    runner.create(id("t2"), wait_ticks(5), TaskOptions::default(), 1).expect("create t2");

    let report = runner.run(&host, 1, 20.0, 1);
    assert_eq!(report.advanced, 1);
}

#[test]
fn run_stops_once_cpu_limit_is_reached() {
    let host = FakeHostContext::new().with_cpu(20.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(5), TaskOptions::default(), 1).expect("create");

    let report = runner.run(&host, 1, 20.0, 64);
    assert_eq!(report.advanced, 0);
    assert!(report.budget_exhausted);
}

#[test]
fn a_task_exceeding_max_ticks_is_cancelled() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner
        .create(
            id("t1"),
            wait_ticks(10),
            TaskOptions {
                max_ticks: 2,
                ..TaskOptions::default()
            },
            1,
        )
        .expect("create");

    runner.run(&host, 1, 20.0, 64);
    runner.run(&host, 2, 20.0, 64);
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Cancelled));
}

#[test]
fn persist_writes_records_and_prunes_after_cleanup_window() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner
        .create(
            id("t1"),
            wait_ticks(0),
            TaskOptions {
                cleanup_after_ticks: 2,
                ..TaskOptions::default()
            },
            1,
        )
        .expect("create");
    runner.run(&host, 1, 20.0, 64);

    let mut root = DurableRoot::default();
    runner.persist(1, &mut root).expect("persist");
    assert_eq!(runner.len(), 1);

    runner.persist(4, &mut root).expect("persist");
    assert_eq!(runner.len(), 0);
}

#[test]
fn restore_reclassifies_running_tasks_as_failed_with_state_lost() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner
        .create(id("t1"), wait_until(|_cx| false, 100), TaskOptions::default(), 1)
        .expect("create");
    runner.run(&host, 1, 20.0, 64);
    assert_eq!(runner.status(&id("t1")), Some(TaskStatus::Running));

    let mut root = DurableRoot::default();
    runner.persist(1, &mut root).expect("persist");

    let restored = TaskRunner::restore(&root, HashMap::new(), 2).expect("restore");
    assert_eq!(restored.status(&id("t1")), Some(TaskStatus::Failed));
    assert!(restored.error(&id("t1")).expect("error").contains("state lost"));
}

#[test]
fn restore_restarts_pending_tasks_from_their_factory() {
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(3), TaskOptions::default(), 1).expect("create");

    let mut root = DurableRoot::default();
    runner.persist(1, &mut root).expect("persist");

    let mut factories: HashMap<String, (BodyFactory, TaskOptions)> = HashMap::new();
    factories.insert("t1".to_string(), (Box::new(|| wait_ticks(3)), TaskOptions::default()));

    let restored = TaskRunner::restore(&root, factories, 2).expect("restore");
    assert_eq!(restored.status(&id("t1")), Some(TaskStatus::Pending));
}

#[test]
fn restore_fails_a_pending_task_with_no_matching_factory() {
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(3), TaskOptions::default(), 1).expect("create");

    let mut root = DurableRoot::default();
    runner.persist(1, &mut root).expect("persist");

    let restored = TaskRunner::restore(&root, HashMap::new(), 2).expect("restore");
    assert_eq!(restored.status(&id("t1")), Some(TaskStatus::Failed));
    assert!(restored.error(&id("t1")).expect("error").contains("had no factory"));
}

#[test]
fn restore_keeps_terminal_outcomes_verbatim() {
    let host = FakeHostContext::new().with_cpu(0.0, 20.0, 9000);
    let mut runner = TaskRunner::new();
    runner.create(id("t1"), wait_ticks(0), TaskOptions::default(), 1).expect("create");
    runner.run(&host, 1, 20.0, 64);

    let mut root = DurableRoot::default();
    runner.persist(1, &mut root).expect("persist");

    let restored = TaskRunner::restore(&root, HashMap::new(), 2).expect("restore");
    assert_eq!(restored.status(&id("t1")), Some(TaskStatus::Completed));
    assert_eq!(restored.result(&id("t1")), Some(&Value::Null));
}
