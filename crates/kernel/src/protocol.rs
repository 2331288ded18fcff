// SPDX-License-Identifier: MIT

//! Named, typed, heap-resident coordination singletons (spec.md §4.2).
//!
//! Protocols replace ad-hoc shared fields of `DurableRoot` with typed
//! objects accessible from any process during one global lifetime; they are
//! never persisted directly (the owning process copies state into a
//! reserved `DurableRoot` slot at tick end if it needs to survive).

use hive_core::KernelError;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;

/// Marker for a type that can live in the protocol registry.
pub trait Protocol: Default + 'static {}

/// Reserved names for the standard six protocols (spec.md §4.2 table).
pub mod names {
    pub const STATE_COORDINATION: &str = "state-coordination";
    pub const ROLE_MANAGEMENT: &str = "role-management";
    pub const BEHAVIOR_COORDINATION: &str = "behavior-coordination";
    pub const BOOTSTRAP_COORDINATION: &str = "bootstrap-coordination";
    pub const METRICS_COORDINATION: &str = "metrics-coordination";
    pub const HEALTH_MONITORING: &str = "health-monitoring";
}

/// Writers: memory manager, respawn detector. Readers: all processes, which
/// read then `clear_flags` at tick end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StateCoordination {
    pub emergency_reset: bool,
    pub needs_respawn: bool,
}
impl Protocol for StateCoordination {}
impl StateCoordination {
    pub fn clear_flags(&mut self) {
        self.emergency_reset = false;
        self.needs_respawn = false;
    }
}

/// Writer: memory manager. Reader: behavior processes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoleManagement {
    pub counts: HashMap<String, u32>,
}
impl Protocol for RoleManagement {}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BehaviorSummary {
    pub processed: u32,
    pub spawned: u32,
    pub tasks_executed: u32,
}

/// Writer: behavior process. Reader: metrics process.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BehaviorCoordination {
    pub summary: Option<BehaviorSummary>,
}
impl Protocol for BehaviorCoordination {}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BootstrapStatus {
    pub active: bool,
    pub phase: Option<String>,
    pub progress: Option<f64>,
}

/// Writer: bootstrap process. Reader: behavior process.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BootstrapCoordination {
    pub status: Option<BootstrapStatus>,
}
impl Protocol for BootstrapCoordination {}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MemoryUtil {
    pub used: usize,
    pub limit: usize,
    pub pct: f64,
}

/// Writer: memory process. Reader: metrics process.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MetricsCoordination {
    pub memory_util: Option<MemoryUtil>,
}
impl Protocol for MetricsCoordination {}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub score: f64,
    pub state: String,
    pub per_dimension: HashMap<String, f64>,
    pub warnings: Vec<String>,
    pub recovery: Option<String>,
}

/// Writer: health process. Readers: evaluator, metrics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HealthMonitoring {
    pub metrics: Option<HealthMetrics>,
}
impl Protocol for HealthMonitoring {}

/// Name-keyed collection of coordination singletons. Lookup is infallible
/// for registered names; an unregistered name is `UnknownProtocol` (§4.2:
/// "creates-on-first-access is forbidden").
pub struct ProtocolRegistry {
    objects: HashMap<&'static str, Box<dyn Any>>,
}

impl ProtocolRegistry {
    /// Registers the standard six protocols (spec.md §4.2). The only way
    /// to construct a registry in this crate — ad-hoc protocol names are
    /// not supported, matching "creates-on-first-access is forbidden".
    pub fn with_standard_protocols() -> Self {
        let mut objects: HashMap<&'static str, Box<dyn Any>> = HashMap::new();
        objects.insert(names::STATE_COORDINATION, Box::<StateCoordination>::default());
        objects.insert(names::ROLE_MANAGEMENT, Box::<RoleManagement>::default());
        objects.insert(names::BEHAVIOR_COORDINATION, Box::<BehaviorCoordination>::default());
        objects.insert(names::BOOTSTRAP_COORDINATION, Box::<BootstrapCoordination>::default());
        objects.insert(names::METRICS_COORDINATION, Box::<MetricsCoordination>::default());
        objects.insert(names::HEALTH_MONITORING, Box::<HealthMonitoring>::default());
        Self { objects }
    }

    pub fn get<P: Protocol>(&self, name: &str) -> Result<&P, KernelError> {
        self.objects
            .get(name)
            .and_then(|object| object.downcast_ref::<P>())
            .ok_or_else(|| KernelError::UnknownProtocol(name.to_string()))
    }

    pub fn get_mut<P: Protocol>(&mut self, name: &str) -> Result<&mut P, KernelError> {
        self.objects
            .get_mut(name)
            .and_then(|object| object.downcast_mut::<P>())
            .ok_or_else(|| KernelError::UnknownProtocol(name.to_string()))
    }

    /// Clears the transient flags every process reads, at tick end (spec.md
    /// §8 property 7).
    pub fn clear_flags(&mut self) {
        if let Ok(state) = self.get_mut::<StateCoordination>(names::STATE_COORDINATION) {
            state.clear_flags();
        }
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::with_standard_protocols()
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
