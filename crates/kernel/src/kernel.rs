// SPDX-License-Identifier: MIT

//! `Kernel`: the host-facing entry point implementing the full tick
//! pipeline of spec.md §2 and the `loop()` contract of §6.

use crate::init::InitializationManager;
use crate::memory::{build_role_counts, prune_stale_workers};
use crate::metrics::{build_snapshot, SnapshotInputs};
use crate::process::{ProcessEntry, ProcessRegistry};
use crate::protocol::{names, HealthMonitoring, ProtocolRegistry, RoleManagement, StateCoordination};
use crate::respawn::detect_fresh_world;
use crate::task::{BoxedBody, TaskOptions, TaskRunner};
use hive_core::{format_cpu, format_ticks, HostContext, KernelConfig, KernelError, TaskId, TickContext};
use hive_storage::{fields, retain_top_entries, retention_due, DurableRoot, PerformanceSnapshot, ProfilerState};

/// Checked at kernel entry (spec.md §6: "validates presence of required
/// fields and fails fast with `InvalidHostContext`"). A trait-object host
/// cannot omit a field the way a loosely-typed source object could, so
/// this covers the conditions Rust's type system can't already rule out:
/// a non-positive `cpu.limit` would make `fraction_used()` silently treat
/// every tick as 0% used (host.rs's divide-by-zero guard), masking a
/// misconfigured or broken host instead of tripping the emergency
/// threshold.
fn validate_host_context(tick: &TickContext) -> Result<(), KernelError> {
    if tick.cpu.limit <= 0.0 {
        return Err(KernelError::InvalidHostContext {
            reason: format!("cpu.limit must be positive, got {}", tick.cpu.limit),
        });
    }
    if tick.cpu.used < 0.0 {
        return Err(KernelError::InvalidHostContext {
            reason: format!("cpu.used must be non-negative, got {}", tick.cpu.used),
        });
    }
    Ok(())
}

/// Everything a completed `run_tick` call reports back to the host. Never
/// `Err` — "the host-facing `loop()` never throws" (spec.md §6, §7).
#[derive(Debug, Clone)]
pub struct TickReport {
    pub snapshot: PerformanceSnapshot,
    pub respawn_detected: bool,
    pub emergency_triggered: bool,
    pub init_complete: bool,
    pub processes_ran: bool,
}

/// The kernel's heap-resident collaborators: the process and protocol
/// registries, the task runner, and the initialization manager. All of
/// these live for one global's lifetime and are lost on reset, mirroring
/// the source's `Game`-adjacent module-level singletons (spec.md §5).
/// `DurableRoot` is the one thing that survives a reset and is therefore
/// never stored here — it is handed in fresh to every `run_tick` call.
pub struct Kernel {
    config: KernelConfig,
    processes: ProcessRegistry,
    protocols: ProtocolRegistry,
    tasks: TaskRunner,
    init: InitializationManager,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            processes: ProcessRegistry::new(),
            protocols: ProtocolRegistry::with_standard_protocols(),
            tasks: TaskRunner::new(),
            init: InitializationManager::new(),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn register_process(
        &mut self,
        name: impl Into<String>,
        priority: i32,
        singleton: bool,
        entry: Box<dyn ProcessEntry>,
    ) -> Result<(), KernelError> {
        self.processes.register(name, priority, singleton, entry)
    }

    pub fn register_init_phase(&mut self, phase: crate::init::InitPhase) {
        self.init.register_phase(phase);
    }

    pub fn create_task(&mut self, id: TaskId, body: BoxedBody, options: TaskOptions, tick: u64) -> Result<(), KernelError> {
        self.tasks.create(id, body, options, tick)
    }

    pub fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    pub fn protocols_mut(&mut self) -> &mut ProtocolRegistry {
        &mut self.protocols
    }

    pub fn tasks(&self) -> &TaskRunner {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRunner {
        &mut self.tasks
    }

    /// The host's `loop()` (spec.md §6). Implements the eight-stage
    /// pipeline of §2 and the seven-step algorithm of §4.1.
    pub fn run_tick(&mut self, host: &dyn HostContext, root: &mut DurableRoot) -> TickReport {
        let tick = TickContext::assemble(host);
        let mut warnings = Vec::new();

        // Step 1: repair reserved fields.
        root.ensure_reserved_fields();

        // Host context validation (spec.md §6): fail fast on a host context
        // the kernel cannot safely schedule against. A snapshot is still
        // emitted.
        if let Err(err) = validate_host_context(&tick) {
            warnings.push(err.to_string());
            return self.finish_tick(&tick, root, warnings, false, false, false);
        }

        // Step 2: emergency threshold, checked before scheduling anything.
        if tick.cpu_emergency(self.config.cpu_emergency_threshold) {
            warnings.push(format!(
                "Emergency CPU threshold exceeded: {} of {} limit (> {:.0}%)",
                format_cpu(tick.cpu.used),
                format_cpu(tick.cpu.limit),
                self.config.cpu_emergency_threshold * 100.0,
            ));
            if let Ok(state) = self.protocols.get_mut::<StateCoordination>(names::STATE_COORDINATION) {
                state.emergency_reset = true;
            }
            return self.finish_tick(&tick, root, warnings, false, true, false);
        }

        // Step 3: respawn detection short-circuits the tick.
        if detect_fresh_world(root, &tick) {
            if let Ok(state) = self.protocols.get_mut::<StateCoordination>(names::STATE_COORDINATION) {
                state.needs_respawn = true;
            }
            return self.finish_tick(&tick, root, warnings, true, false, false);
        }

        // Phased bootstrap. While incomplete, normal scheduling is skipped
        // but a snapshot is still produced (spec.md §4.5).
        let init_outcome = self.init.tick(host, &tick, root, &self.config);
        if !init_outcome.complete {
            return self.finish_tick(&tick, root, warnings, false, false, false);
        }

        // Steps 4-5: housekeeping ahead of scheduling.
        prune_stale_workers(root, &tick);
        let role_counts = build_role_counts(&tick);
        if let Ok(roles) = self.protocols.get_mut::<RoleManagement>(names::ROLE_MANAGEMENT) {
            roles.counts = role_counts.clone();
        }
        if let Err(err) = root.set(fields::ROLES, &role_counts) {
            warnings.push(format!("failed to persist role counts: {err}"));
        }

        // Step 6: run every registered process in priority order.
        let before_processes = host.cpu_used();
        let scheduler_report = self
            .processes
            .run(host, &tick, root, &mut self.protocols, self.config.cpu_emergency_threshold);
        let processes_elapsed = host.cpu_used() - before_processes;
        for (name, fault) in &scheduler_report.faults {
            warnings.push(KernelError::ProcessFault {
                name: name.clone(),
                kind: fault.kind.clone(),
                message: fault.message.clone(),
            }.to_string());
        }
        for name in &scheduler_report.budget_skips {
            warnings.push(format!("budget exceeded before process '{name}' could run"));
        }

        // Task runner: nested conceptually within processes (spec.md §2
        // step 5); driven directly by the kernel here since this repo has
        // no domain process to host it (spec.md §1 non-goals).
        let before_tasks = host.cpu_used();
        let task_report = self.tasks.run(host, tick.tick, tick.cpu.limit, self.config.max_tasks_per_tick);
        let tasks_elapsed = host.cpu_used() - before_tasks;
        for (id, message) in &task_report.failed {
            warnings.push(KernelError::TaskFault {
                id: id.to_string(),
                message: message.clone(),
            }.to_string());
        }
        if let Err(err) = self.tasks.persist(tick.tick, root) {
            warnings.push(format!("failed to persist tasks: {err}"));
        }

        // Step 7 (spec.md §3, §6): record this tick's phase timings into
        // the profiler reserved field and enforce retention.
        if self.config.profiler_enabled {
            self.record_profiler(&tick, root, processes_elapsed, tasks_elapsed, &mut warnings);
        }

        self.finish_tick(&tick, root, warnings, false, true, true)
    }

    /// Records elapsed CPU for the "processes" and "tasks" phases into the
    /// profiler reserved field and enforces retention (spec.md §3, §6).
    fn record_profiler(
        &self,
        tick: &TickContext,
        root: &mut DurableRoot,
        processes_elapsed: f64,
        tasks_elapsed: f64,
        warnings: &mut Vec<String>,
    ) {
        let mut profiler = root.get::<ProfilerState>(fields::PROFILER).ok().flatten().unwrap_or_default();
        profiler.record("processes", processes_elapsed);
        profiler.record("tasks", tasks_elapsed);

        if retention_due(tick.tick, self.config.profiler_retention_interval_ticks) {
            retain_top_entries(&mut profiler.data, self.config.profiler_max_entries);
        }

        if let Err(err) = root.set(fields::PROFILER, &profiler) {
            warnings.push(format!("failed to persist profiler state: {err}"));
        }
    }

    fn finish_tick(
        &mut self,
        tick: &TickContext,
        root: &mut DurableRoot,
        warnings: Vec<String>,
        respawn_detected: bool,
        emergency_triggered: bool,
        processes_ran: bool,
    ) -> TickReport {
        let role_counts = root.get::<std::collections::HashMap<String, u32>>(fields::ROLES).ok().flatten();
        let health = self
            .protocols
            .get::<HealthMonitoring>(names::HEALTH_MONITORING)
            .ok()
            .and_then(|monitoring| monitoring.metrics.clone())
            .and_then(|metrics| serde_json::to_value(metrics).ok());

        let snapshot = build_snapshot(
            tick,
            SnapshotInputs {
                role_counts,
                structures: None,
                construction_sites: None,
                health,
                spawn_orders: None,
                warnings,
            },
        );
        let _ = root.set_stats(&snapshot);
        self.protocols.clear_flags();

        tracing::info!(
            tick = tick.tick,
            cpu = %format_cpu(tick.cpu.used),
            elapsed = %format_ticks(1),
            "tick complete"
        );

        TickReport {
            snapshot,
            respawn_detected,
            emergency_triggered,
            init_complete: self.init.is_complete(),
            processes_ran,
        }
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
