// SPDX-License-Identifier: MIT

//! The two housekeeping steps the memory manager performs ahead of process
//! scheduling each tick (spec.md §4.1 algorithm steps 4-5). Domain memory
//! managers are out of scope for this kernel (spec.md §1); the kernel
//! performs this minimal housekeeping itself since nothing else owns it.

use hive_core::TickContext;
use hive_storage::{fields, DurableRoot};
use std::collections::HashMap;

/// Removes `process_state` entries keyed by a worker id that no longer
/// appears in the live game object table (spec.md §4.1 step 4).
pub fn prune_stale_workers(root: &mut DurableRoot, tick: &TickContext) {
    let live_ids: std::collections::HashSet<&str> = tick.workers().iter().map(|w| w.id.as_str()).collect();
    if let Some(state) = root.raw_mut().get_mut(fields::PROCESS_STATE).and_then(|v| v.as_object_mut()) {
        state.retain(|key, _| live_ids.contains(key.as_str()));
    }
}

/// Tallies live workers by role (spec.md §4.1 step 5).
pub fn build_role_counts(tick: &TickContext) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for worker in tick.workers() {
        *counts.entry(worker.role.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
