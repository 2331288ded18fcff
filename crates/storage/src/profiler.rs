// SPDX-License-Identifier: MIT

//! The `profiler` reserved field (spec.md §6): per-span call counts and
//! cumulative time, retained only for the top `N` entries by time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named span's accumulated cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilerEntry {
    pub calls: u64,
    #[serde(rename = "time")]
    pub time_ms: f64,
}

/// The full `profiler` reserved field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilerState {
    #[serde(default)]
    pub data: HashMap<String, ProfilerEntry>,
    #[serde(default)]
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
}

impl ProfilerState {
    /// Record one call against `name`, accumulating its cost.
    pub fn record(&mut self, name: &str, elapsed_ms: f64) {
        let entry = self.data.entry(name.to_string()).or_default();
        entry.calls += 1;
        entry.time_ms += elapsed_ms;
        self.total += 1;
    }
}

/// Drop all but the `max_entries` spans with the highest cumulative time
/// (spec.md §6: "retention policy caps entries at N=500 by cumulative
/// time"). Ties break by name for determinism.
pub fn retain_top_entries(data: &mut HashMap<String, ProfilerEntry>, max_entries: usize) {
    if data.len() <= max_entries {
        return;
    }
    let mut ranked: Vec<(String, ProfilerEntry)> =
        data.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| {
        b.1.time_ms
            .partial_cmp(&a.1.time_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(max_entries);
    *data = ranked.into_iter().collect();
}

/// True when the retention pass should run this tick (spec.md §6: "every
/// 100 ticks").
pub fn retention_due(tick: u64, interval_ticks: u64) -> bool {
    interval_ticks > 0 && tick % interval_ticks == 0
}

#[cfg(test)]
#[path = "profiler_tests.rs"]
mod tests;
