// SPDX-License-Identifier: MIT

//! Phased bootstrap initialization bounded by a CPU safety margin and a
//! minimum bucket level, so a fresh global does not drain the bucket in
//! one tick (spec.md §4.5).

use hive_core::{HostContext, KernelConfig, TickContext};
use hive_storage::DurableRoot;
use std::collections::HashSet;

/// `{name, priority, cpu_estimate, execute}` (spec.md §4.5).
pub struct InitPhase {
    pub name: String,
    pub priority: i32,
    pub cpu_estimate: f64,
    execute: Box<dyn FnMut(&TickContext, &mut DurableRoot) -> Result<(), String>>,
    registration_order: u64,
}

impl InitPhase {
    pub fn new(
        name: impl Into<String>,
        priority: i32,
        cpu_estimate: f64,
        execute: impl FnMut(&TickContext, &mut DurableRoot) -> Result<(), String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            cpu_estimate,
            execute: Box::new(execute),
            registration_order: 0,
        }
    }
}

/// Outcome of one `tick()` call (spec.md §4.5: "returns `{complete: bool}`;
/// when `complete=true`, the kernel resumes normal scheduling that same
/// tick").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    pub complete: bool,
}

/// Heap-resident (dropped on global reset, like everything else in §5)
/// manager tracking which phases have run this global's lifetime.
#[derive(Default)]
pub struct InitializationManager {
    phases: Vec<InitPhase>,
    done: HashSet<String>,
    ticks_spent: u32,
    next_order: u64,
}

impl InitializationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_phase(&mut self, mut phase: InitPhase) {
        phase.registration_order = self.next_order;
        self.next_order += 1;
        self.phases.push(phase);
    }

    pub fn is_complete(&self) -> bool {
        self.done.len() == self.phases.len()
    }

    /// Runs phases in `(priority asc, registration order asc)` while both
    /// the safety margin and the minimum bucket level hold, up to
    /// `max_init_ticks`, after which remaining phases are force-run
    /// regardless of budget (spec.md §4.5).
    pub fn tick(
        &mut self,
        host: &dyn HostContext,
        tick: &TickContext,
        root: &mut DurableRoot,
        config: &KernelConfig,
    ) -> InitOutcome {
        if self.phases.is_empty() {
            return InitOutcome { complete: true };
        }

        self.ticks_spent += 1;
        let force = self.ticks_spent >= config.max_init_ticks;

        self.phases
            .sort_by(|a, b| a.priority.cmp(&b.priority).then(a.registration_order.cmp(&b.registration_order)));

        for phase in &mut self.phases {
            if self.done.contains(&phase.name) {
                continue;
            }
            let within_budget = host.cpu_used() + phase.cpu_estimate <= tick.cpu.limit * config.init_safety_margin;
            let within_bucket = tick.cpu.bucket >= config.init_min_bucket_level;
            if !force && !(within_budget && within_bucket) {
                break;
            }
            if let Err(message) = (phase.execute)(tick, root) {
                tracing::warn!(phase = %phase.name, error = %message, "init phase faulted");
            }
            self.done.insert(phase.name.clone());
        }

        InitOutcome {
            complete: self.is_complete(),
        }
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
