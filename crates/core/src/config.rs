// SPDX-License-Identifier: MIT

//! Kernel-wide tunables.
//!
//! The teacher's daemon reads a `Config` from a TOML file on disk
//! (`daemon::lifecycle::Config::load`); this kernel has no filesystem
//! (spec.md §1 non-goals), so `KernelConfig` is instead a plain, serde-able
//! struct built in code or deserialized from a value the host already owns
//! (e.g. a field the embedding bot keeps in `DurableRoot.process_state`).
//! `Default` supplies every numeric default spec.md names explicitly.

use serde::{Deserialize, Serialize};

/// Tunable thresholds and budgets for one kernel instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Fraction of `cpu.limit` at which the scheduler refuses to start any
    /// process this tick (spec.md §4.1). Default `0.9`.
    pub cpu_emergency_threshold: f64,

    /// During initialization, a phase may run only while
    /// `cpu.used() + phase.cpu_estimate <= cpu.limit * safety_margin`
    /// (spec.md §4.5). Default `0.7`.
    pub init_safety_margin: f64,

    /// Minimum CPU bucket required to run another initialization phase
    /// (spec.md §4.5). Default `500`.
    pub init_min_bucket_level: i64,

    /// Hard cap on ticks spent in phased initialization before remaining
    /// phases are force-run regardless of budget (spec.md §4.5).
    /// Default `10`.
    pub max_init_ticks: u32,

    /// Default number of ticks a terminal task is kept before cleanup
    /// (spec.md §3), used when a task's options don't override it.
    /// Default `5`.
    pub default_cleanup_after_ticks: u32,

    /// Maximum number of tasks the runner will advance in a single tick,
    /// independent of CPU budget (spec.md §4.3 "per-tick task quota").
    /// Default `64`.
    pub max_tasks_per_tick: u32,

    /// Profiler retention cap: number of named spans kept, ranked by
    /// cumulative time (spec.md §6). Default `500`.
    pub profiler_max_entries: usize,

    /// How often (in ticks) the profiler retention pass runs (spec.md §6).
    /// Default `100`.
    pub profiler_retention_interval_ticks: u64,

    /// Whether the profiler is active at all (spec.md §6 `profiler_enabled`
    /// build-time flag). Default `true`.
    pub profiler_enabled: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            cpu_emergency_threshold: 0.9,
            init_safety_margin: 0.7,
            init_min_bucket_level: 500,
            max_init_ticks: 10,
            default_cleanup_after_ticks: 5,
            max_tasks_per_tick: 64,
            profiler_max_entries: 500,
            profiler_retention_interval_ticks: 100,
            profiler_enabled: true,
        }
    }
}

/// Parses the `profiler_enabled` build-time flag per spec.md §6: only the
/// literal strings `"true"`/`"false"` are recognized; anything else
/// (including absence, represented here as `None`) emits a warning message
/// and defaults to enabled.
///
/// Returns `(enabled, warning)` where `warning` is `Some(..)` when the
/// input was not a recognized literal.
pub fn parse_profiler_flag(raw: Option<&str>) -> (bool, Option<String>) {
    match raw {
        Some("true") => (true, None),
        Some("false") => (false, None),
        Some(other) => (
            true,
            Some(format!(
                "profiler_enabled flag '{other}' is not 'true' or 'false'; defaulting to enabled"
            )),
        ),
        None => (
            true,
            Some("profiler_enabled flag unset; defaulting to enabled".to_string()),
        ),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
