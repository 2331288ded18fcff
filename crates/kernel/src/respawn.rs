// SPDX-License-Identifier: MIT

//! Distinguishes "fresh world" from normal operation and recovery (spec.md
//! §4.6).

use hive_core::TickContext;
use hive_storage::{fields, DurableRoot};

/// A reserved slot is treated as empty for respawn purposes whether it is
/// altogether absent or was just repaired to `{}` by
/// `DurableRoot::ensure_reserved_fields` (which runs before this check, per
/// spec.md §4.1 step 1 preceding step 3).
fn slot_is_empty(root: &DurableRoot, field: &str) -> bool {
    match root.raw().get(field) {
        None => true,
        Some(value) => value.as_object().map(serde_json::Map::is_empty).unwrap_or(false),
    }
}

/// "Fresh world" is a just-reset room: no persisted tasks or role counts
/// yet, no live workers, but at least one spawn exists (a spawn with no
/// creeps is the signature of a reset; a colony with zero spawns at all is
/// a map edge case, not a reset, and must not short-circuit the tick).
pub fn detect_fresh_world(root: &DurableRoot, tick: &TickContext) -> bool {
    slot_is_empty(root, fields::TASKS)
        && slot_is_empty(root, fields::ROLES)
        && tick.workers().is_empty()
        && !tick.spawns().is_empty()
}

#[cfg(test)]
#[path = "respawn_tests.rs"]
mod tests;
