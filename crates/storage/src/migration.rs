// SPDX-License-Identifier: MIT

//! Schema version bookkeeping for `DurableRoot`.
//!
//! Not named by spec.md, but grounded in the teacher's WAL/snapshot version
//! bump: a future kernel release may need to reshape `process_state` or
//! `tasks` without the host's cooperation (the host just hands back
//! whatever blob it was given). `CURRENT_VERSION` is the version this
//! kernel writes; `migrate` is the identity function today because there is
//! only one version, but the call site in [`crate::durable_root`] is
//! exercised so a future non-identity migration has a home to land in.

/// The schema version this kernel writes into `DurableRoot.schema_version`.
pub const CURRENT_VERSION: u32 = 1;

/// Upgrade a raw JSON object in place to `CURRENT_VERSION`, if needed.
///
/// Returns the version the object was at before migration.
pub fn migrate(root: &mut serde_json::Map<String, serde_json::Value>) -> u32 {
    let found = root
        .get(crate::fields::SCHEMA_VERSION)
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(0);

    // No migrations exist yet; every version below CURRENT_VERSION is
    // treated as CURRENT_VERSION once `ensure_reserved_fields` runs.
    root.insert(
        crate::fields::SCHEMA_VERSION.to_string(),
        serde_json::Value::from(CURRENT_VERSION),
    );

    found
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
