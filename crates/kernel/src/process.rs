// SPDX-License-Identifier: MIT

//! Process registry and priority-ordered scheduling (spec.md §4.1).

use crate::protocol::ProtocolRegistry;
use hive_core::{HostContext, KernelError, TickContext};
use hive_storage::DurableRoot;

/// What a process reports back after one invocation (spec.md §4.1 step 6),
/// feeding the `behavior-coordination` protocol's summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    pub summary: Option<serde_json::Value>,
}

impl ProcessOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_summary(summary: serde_json::Value) -> Self {
        Self {
            summary: Some(summary),
        }
    }
}

/// Raised by a process's entry point. Caught at the scheduler boundary and
/// recorded as a `KernelError::ProcessFault`; never propagated further.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ProcessError {
    pub kind: String,
    pub message: String,
}

impl ProcessError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// What a process invocation sees: the frozen tick view, the durable root,
/// and the protocol registry. Borrowed fresh for each process invocation.
pub struct ProcessCx<'a> {
    pub tick: &'a TickContext,
    pub root: &'a mut DurableRoot,
    pub protocols: &'a mut ProtocolRegistry,
}

/// A process's single-invocation entry point (spec.md §4.1).
pub trait ProcessEntry {
    fn invoke(&mut self, cx: &mut ProcessCx<'_>) -> Result<ProcessOutcome, ProcessError>;
}

/// Blanket impl so a plain closure can serve as a process body.
impl<F> ProcessEntry for F
where
    F: FnMut(&mut ProcessCx<'_>) -> Result<ProcessOutcome, ProcessError>,
{
    fn invoke(&mut self, cx: &mut ProcessCx<'_>) -> Result<ProcessOutcome, ProcessError> {
        self(cx)
    }
}

struct ProcessDescriptor {
    name: String,
    priority: i32,
    registration_order: u64,
    entry: Box<dyn ProcessEntry>,
}

/// What a tick's process pass produced (spec.md §4.1 steps 2, 6).
#[derive(Debug, Default)]
pub struct SchedulerReport {
    pub emergency_triggered: bool,
    pub faults: Vec<(String, ProcessError)>,
    pub budget_skips: Vec<String>,
    pub summaries: Vec<(String, serde_json::Value)>,
}

/// Registered processes, run in `(priority asc, registration_order asc)`
/// order (spec.md §3, §5).
#[derive(Default)]
pub struct ProcessRegistry {
    processes: Vec<ProcessDescriptor>,
    next_order: u64,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process. `singleton=true` silently replaces any prior
    /// registration under the same name, keeping its original position in
    /// registration order (supports code reload without reshuffling
    /// tie-break order); otherwise a name collision is `DuplicateName`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        priority: i32,
        singleton: bool,
        entry: Box<dyn ProcessEntry>,
    ) -> Result<(), KernelError> {
        let name = name.into();
        if let Some(existing) = self.processes.iter().position(|p| p.name == name) {
            if !singleton {
                return Err(KernelError::DuplicateName(name));
            }
            let registration_order = self.processes[existing].registration_order;
            self.processes[existing] = ProcessDescriptor {
                name,
                priority,
                registration_order,
                entry,
            };
            return Ok(());
        }
        let registration_order = self.next_order;
        self.next_order += 1;
        self.processes.push(ProcessDescriptor {
            name,
            priority,
            registration_order,
            entry,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Run every registered process once, in order, under the emergency
    /// threshold and per-process budget guard (spec.md §4.1 algorithm steps
    /// 2 and 6). Callers are expected to have already decided whether the
    /// emergency threshold was crossed *before* calling this (step 2 is a
    /// hard skip of the whole pass); this method still re-checks it so it
    /// is safe to call standalone.
    pub fn run(
        &mut self,
        host: &dyn HostContext,
        tick: &TickContext,
        root: &mut DurableRoot,
        protocols: &mut ProtocolRegistry,
        emergency_threshold: f64,
    ) -> SchedulerReport {
        let mut report = SchedulerReport::default();

        if tick.cpu_emergency(emergency_threshold) {
            report.emergency_triggered = true;
            return report;
        }

        self.processes
            .sort_by(|a, b| a.priority.cmp(&b.priority).then(a.registration_order.cmp(&b.registration_order)));

        for proc in &mut self.processes {
            if host.cpu_used() >= tick.cpu.limit {
                report.budget_skips.push(proc.name.clone());
                continue;
            }

            let span = tracing::info_span!("process", name = %proc.name, priority = proc.priority);
            let _guard = span.enter();

            let mut cx = ProcessCx {
                tick,
                root: &mut *root,
                protocols: &mut *protocols,
            };
            match proc.entry.invoke(&mut cx) {
                Ok(outcome) => {
                    if let Some(summary) = outcome.summary {
                        report.summaries.push((proc.name.clone(), summary));
                    }
                }
                Err(err) => {
                    tracing::warn!(process = %proc.name, kind = %err.kind, error = %err.message, "process fault");
                    report.faults.push((proc.name.clone(), err));
                }
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
