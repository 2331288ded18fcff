// SPDX-License-Identifier: MIT

//! Explicit state-machine encoding of a cooperative "generator" (spec.md
//! §4.3, design notes §9: stable Rust has no native coroutines, so a task
//! body is a `step` function returning `Pending | Ready(value) | Failed`).

use hive_core::HostContext;
use serde_json::Value;

/// The outcome of advancing a [`TaskBody`] by one step.
pub enum Poll {
    /// No yield point reached yet; call `step` again next tick.
    Pending,
    /// The body terminated with a value.
    Ready(Value),
    /// The body raised; carries the stringified error.
    Failed(String),
}

/// Per-step context handed to a body: the current tick and a way to measure
/// its own CPU cost so it can self-limit internal work (spec.md §4.3: the
/// runner measures cost from `HostContext` deltas, but bodies that do
/// variable-length internal work benefit from checking this too).
pub struct StepCx<'a> {
    pub tick: u64,
    host: &'a dyn HostContext,
    step_start_cpu: f64,
}

impl<'a> StepCx<'a> {
    pub fn new(tick: u64, host: &'a dyn HostContext) -> Self {
        Self {
            tick,
            host,
            step_start_cpu: host.cpu_used(),
        }
    }

    pub fn cpu_used_this_step(&self) -> f64 {
        self.host.cpu_used() - self.step_start_cpu
    }
}

/// A cooperative task body. All eleven combinators in spec.md §4.3 are
/// adapters implementing this trait over other bodies, not free functions
/// that spawn new tasks.
pub trait TaskBody {
    fn step(&mut self, cx: &mut StepCx<'_>) -> Poll;
}

/// A boxed, type-erased body — every task and combinator traffics in this,
/// since results must ultimately serialize into `DurableRoot.tasks`.
pub type BoxedBody = Box<dyn TaskBody>;

/// Produces a fresh body instance. Generator instances can't be
/// checkpointed and resumed mid-internal-state across a global reset, so
/// combinators that restart sub-bodies (`retry`, `repeat`, `whilst`,
/// `interval`, `map`, `filter`) take a factory rather than a built body.
pub type BodyFactory = Box<dyn FnMut() -> BoxedBody>;

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
