// SPDX-License-Identifier: MIT

//! Names of `DurableRoot`'s reserved fields (spec.md §3, §6).

pub const STATS: &str = "stats";
pub const PROFILER: &str = "profiler";
pub const TASKS: &str = "tasks";
pub const ROLES: &str = "roles";
pub const HEALTH: &str = "health";
pub const PROCESS_STATE: &str = "process_state";
pub const SCHEMA_VERSION: &str = "schema_version";

/// All reserved field names, in the order `spec.md` §3 lists them.
pub const ALL: &[&str] = &[STATS, PROFILER, TASKS, ROLES, HEALTH, PROCESS_STATE];
