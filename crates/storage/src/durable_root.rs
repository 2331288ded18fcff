// SPDX-License-Identifier: MIT

//! `DurableRoot`: the single serializable value graph that survives a
//! global reset (spec.md §3).

use crate::error::StorageError;
use crate::{fields, migration, snapshot::PerformanceSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Wraps the host's opaque persistable object and exposes its reserved
/// slots through typed accessors.
///
/// `DurableRoot` never holds a reference to host state; it owns a plain
/// `serde_json::Value` that round-trips losslessly through whatever the
/// host actually persists (spec.md §3: "must be a plain value graph, no
/// cycles, no host references").
#[derive(Debug, Clone, Default)]
pub struct DurableRoot {
    root: Map<String, Value>,
}

impl DurableRoot {
    /// Wrap a host-provided value. `Value::Null` (an empty `Memory`) is
    /// treated as an empty object; anything else that isn't an object is
    /// rejected, since the kernel requires a value graph it can add
    /// reserved fields to.
    pub fn wrap(value: Value) -> Result<Self, StorageError> {
        match value {
            Value::Null => Ok(Self { root: Map::new() }),
            Value::Object(map) => Ok(Self { root: map }),
            other => Err(StorageError::NotAnObject(type_name(&other))),
        }
    }

    /// Consume this root, returning the plain JSON value the host should
    /// persist.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Borrow the raw JSON object, e.g. for diagnostics or an external
    /// probe writing an ad-hoc key (spec.md §7's `stats.mcpTest` example).
    pub fn raw(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Mutable access to the raw JSON object. Prefer the typed accessors
    /// below; this exists for probes and domain managers outside the
    /// kernel's reserved-field contract.
    pub fn raw_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Repair any missing reserved fields (spec.md §4.1 step 1) and run
    /// schema migration. Idempotent: calling this twice in the same tick
    /// has the same effect as calling it once (spec.md §8 round-trip
    /// property).
    pub fn ensure_reserved_fields(&mut self) {
        migration::migrate(&mut self.root);

        // `stats` has required fields with no serde default, so a bare
        // `{}` would fail to decode; it gets its own zeroed snapshot.
        for name in fields::ALL.iter().filter(|name| **name != fields::STATS) {
            self.root
                .entry((*name).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        self.ensure_stats();
    }

    /// Ensure `stats` specifically exists, defaulting to a zeroed snapshot
    /// if absent. Safe to call before every process runs and again at tick
    /// end (spec.md §7: external probes must see `stats` present even if
    /// it "has just been reset").
    pub fn ensure_stats(&mut self) {
        if self.root.get(fields::STATS).is_none() {
            let _ = self.set(fields::STATS, &PerformanceSnapshot::default());
        }
    }

    /// Decode a reserved or ad-hoc field. Returns `Ok(None)` if the field
    /// is absent (distinct from a decode error).
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, StorageError> {
        match self.root.get(field) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    field: field.to_string(),
                    source,
                }),
        }
    }

    /// Encode and store a value at `field`, overwriting any prior value.
    pub fn set<T: Serialize>(&mut self, field: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_value(value).map_err(|source| StorageError::Encode {
            field: field.to_string(),
            source,
        })?;
        self.root.insert(field.to_string(), encoded);
        Ok(())
    }

    /// Typed accessor for `stats` (spec.md §3: "StatsCollector is the sole
    /// owner of this field").
    pub fn stats(&self) -> Result<Option<PerformanceSnapshot>, StorageError> {
        self.get(fields::STATS)
    }

    pub fn set_stats(&mut self, snapshot: &PerformanceSnapshot) -> Result<(), StorageError> {
        self.set(fields::STATS, snapshot)
    }

    /// The schema version this root was written at.
    pub fn schema_version(&self) -> u32 {
        self.root
            .get(fields::SCHEMA_VERSION)
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(0)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "durable_root_tests.rs"]
mod tests;
