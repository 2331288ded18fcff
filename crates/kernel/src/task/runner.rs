// SPDX-License-Identifier: MIT

//! `TaskRunner`: advances cooperative tasks one step per tick under a CPU
//! budget, with durable state sufficient for resumption across ticks but
//! not across global resets (spec.md §4.3).

use super::body::{BodyFactory, BoxedBody, Poll, StepCx};
use hive_core::{HostContext, KernelError, TaskId};
use hive_storage::{fields, DurableRoot, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled)
    }
}

/// Per-task tunables (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskOptions {
    pub max_ticks: u32,
    pub cpu_budget: f64,
    pub priority: i32,
    pub cleanup_after_ticks: u32,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            max_ticks: u32::MAX,
            cpu_budget: f64::MAX,
            priority: 0,
            cleanup_after_ticks: 5,
        }
    }
}

/// The persisted shape of one task, written into `DurableRoot.tasks`
/// (spec.md §4.3: "serialize every non-cleaned task's `{id, status,
/// result?, error?, tick_created, tick_completed?, ticks_executed}`").
/// Deliberately excludes `options` and the live generator: options are
/// supplied again by the caller's [`BodyFactory`] registration at restore
/// time, the way process descriptors are re-registered at module load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tick_created: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_completed: Option<u64>,
    pub ticks_executed: u32,
}

struct Task {
    id: TaskId,
    status: TaskStatus,
    body: Option<BoxedBody>,
    tick_created: u64,
    ticks_executed: u32,
    tick_completed: Option<u64>,
    result: Option<Value>,
    error: Option<String>,
    options: TaskOptions,
    insertion_order: u64,
}

impl Task {
    fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.to_string(),
            status: self.status,
            result: self.result.clone(),
            error: self.error.clone(),
            tick_created: self.tick_created,
            tick_completed: self.tick_completed,
            ticks_executed: self.ticks_executed,
        }
    }
}

/// What one `run()` pass over the task list produced.
#[derive(Debug, Default)]
pub struct TaskRunReport {
    pub advanced: u32,
    pub completed: Vec<TaskId>,
    pub failed: Vec<(TaskId, String)>,
    pub budget_exhausted: bool,
}

/// Owns the live task set for one kernel lifetime (dropped on global
/// reset, like every other heap-resident collaborator — spec.md §5).
#[derive(Default)]
pub struct TaskRunner {
    tasks: HashMap<TaskId, Task>,
    next_order: u64,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `create(id, body, options)`: fails with `DuplicateTaskId` if `id`
    /// exists and is not terminal (spec.md §4.3).
    pub fn create(
        &mut self,
        id: TaskId,
        body: BoxedBody,
        options: TaskOptions,
        tick: u64,
    ) -> Result<(), KernelError> {
        if let Some(existing) = self.tasks.get(&id) {
            if !existing.status.is_terminal() {
                return Err(KernelError::DuplicateTaskId(id.to_string()));
            }
        }
        let insertion_order = self.next_order;
        self.next_order += 1;
        self.tasks.insert(
            id.clone(),
            Task {
                id,
                status: TaskStatus::Pending,
                body: Some(body),
                tick_created: tick,
                ticks_executed: 0,
                tick_completed: None,
                result: None,
                error: None,
                options,
                insertion_order,
            },
        );
        Ok(())
    }

    pub fn cancel(&mut self, id: &TaskId, reason: impl Into<String>, tick: u64) {
        if let Some(task) = self.tasks.get_mut(id) {
            if !task.status.is_terminal() {
                task.status = TaskStatus::Cancelled;
                task.error = Some(reason.into());
                task.tick_completed = Some(tick);
                task.body = None;
            }
        }
    }

    pub fn status(&self, id: &TaskId) -> Option<TaskStatus> {
        self.tasks.get(id).map(|t| t.status)
    }

    pub fn result(&self, id: &TaskId) -> Option<&Value> {
        self.tasks.get(id).and_then(|t| t.result.as_ref())
    }

    pub fn error(&self, id: &TaskId) -> Option<&str> {
        self.tasks.get(id).and_then(|t| t.error.as_deref())
    }

    fn runnable_order(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, t)| !t.status.is_terminal())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_by(|a, b| {
            let ta = &self.tasks[a];
            let tb = &self.tasks[b];
            tb.options
                .priority
                .cmp(&ta.options.priority)
                .then(ta.insertion_order.cmp(&tb.insertion_order))
        });
        ids
    }

    /// Drive tasks in `(priority desc, insertion order asc)`, stopping when
    /// the tick's CPU ceiling is reached, no runnable task remains, or
    /// `max_quota` tasks have been advanced (spec.md §4.3).
    pub fn run(&mut self, host: &dyn HostContext, tick: u64, tick_cpu_limit: f64, max_quota: u32) -> TaskRunReport {
        let mut report = TaskRunReport::default();
        for id in self.runnable_order() {
            if report.advanced >= max_quota {
                break;
            }
            if host.cpu_used() >= tick_cpu_limit {
                report.budget_exhausted = true;
                break;
            }
            self.step_one(&id, host, tick, &mut report);
            report.advanced += 1;
        }
        report
    }

    fn step_one(&mut self, id: &TaskId, host: &dyn HostContext, tick: u64, report: &mut TaskRunReport) {
        let Some(task) = self.tasks.get_mut(id) else {
            return;
        };
        task.status = TaskStatus::Running;
        let mut cx = StepCx::new(tick, host);
        let Some(body) = task.body.as_mut() else {
            return;
        };
        let poll = body.step(&mut cx);
        let over_budget = cx.cpu_used_this_step() > task.options.cpu_budget;

        match poll {
            Poll::Pending => {
                task.ticks_executed += 1;
                if over_budget {
                    tracing::warn!(task = %id, "task step exceeded its cpu_budget");
                }
                if task.ticks_executed >= task.options.max_ticks {
                    task.status = TaskStatus::Cancelled;
                    task.error = Some("max ticks exceeded".to_string());
                    task.tick_completed = Some(tick);
                    task.body = None;
                }
            }
            Poll::Ready(value) => {
                task.status = TaskStatus::Completed;
                task.result = Some(value);
                task.tick_completed = Some(tick);
                task.body = None;
                report.completed.push(id.clone());
            }
            Poll::Failed(message) => {
                tracing::warn!(task = %id, error = %message, "task fault");
                task.status = TaskStatus::Failed;
                task.error = Some(message.clone());
                task.tick_completed = Some(tick);
                task.body = None;
                report.failed.push((id.clone(), message));
            }
        }
    }

    /// Removes terminal tasks `cleanup_after_ticks` after `tick_completed`
    /// and persists everything that remains into `DurableRoot.tasks`
    /// (spec.md §4.3, §8 property 4).
    pub fn persist(&mut self, tick: u64, root: &mut DurableRoot) -> Result<(), StorageError> {
        self.tasks.retain(|_, task| match task.tick_completed {
            Some(completed_at) => tick < completed_at + u64::from(task.options.cleanup_after_ticks),
            None => true,
        });

        let mut serialized = serde_json::Map::new();
        for (id, task) in &self.tasks {
            let value = serde_json::to_value(task.to_record()).map_err(|source| StorageError::Encode {
                field: fields::TASKS.to_string(),
                source,
            })?;
            serialized.insert(id.to_string(), value);
        }
        root.set(fields::TASKS, &Value::Object(serialized))
    }

    /// Recreates tasks from `DurableRoot.tasks` after a global reset.
    /// Tasks persisted as `running` are reclassified `failed` with a "state
    /// lost" error — their generator instance is unrecoverable and the
    /// matching factory, if any, is never invoked for them. Tasks
    /// persisted `pending` never executed a step, so no continuation state
    /// was lost; they are restarted fresh from their factory. Terminal
    /// tasks keep their recorded outcome verbatim (spec.md §4.3 "Restore").
    pub fn restore(
        root: &DurableRoot,
        mut factories: HashMap<String, (BodyFactory, TaskOptions)>,
        tick: u64,
    ) -> Result<Self, StorageError> {
        let mut runner = Self::new();
        let records: HashMap<String, TaskRecord> = root.get(fields::TASKS)?.unwrap_or_default();

        for (id_str, record) in records {
            let id = TaskId::new(id_str.clone());
            let factory = factories.remove(&id_str);

            let (status, body, result, error, tick_completed, options) = match record.status {
                TaskStatus::Running => {
                    let options = factory.map(|(_, options)| options).unwrap_or_default();
                    (
                        TaskStatus::Failed,
                        None,
                        None,
                        Some(format!("state lost due to global reset: task '{id_str}' was running")),
                        Some(tick),
                        options,
                    )
                }
                TaskStatus::Pending => match factory {
                    Some((mut make_body, options)) => (TaskStatus::Pending, Some(make_body()), None, None, None, options),
                    None => (
                        TaskStatus::Failed,
                        None,
                        None,
                        Some(format!("state lost due to global reset: task '{id_str}' had no factory")),
                        Some(tick),
                        TaskOptions::default(),
                    ),
                },
                terminal => {
                    let options = factory.map(|(_, options)| options).unwrap_or_default();
                    (terminal, None, record.result.clone(), record.error.clone(), record.tick_completed, options)
                }
            };

            let insertion_order = runner.next_order;
            runner.next_order += 1;
            runner.tasks.insert(
                id.clone(),
                Task {
                    id,
                    status,
                    body,
                    tick_created: record.tick_created,
                    ticks_executed: record.ticks_executed,
                    tick_completed,
                    result,
                    error,
                    options,
                    insertion_order,
                },
            );
        }

        Ok(runner)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
