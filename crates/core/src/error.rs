// SPDX-License-Identifier: MIT

//! The kernel's error taxonomy (spec.md §7).
//!
//! Operational errors (`ProcessFault`, `TaskFault`, `BudgetExceeded`,
//! `StateLost`) never escape the kernel boundary as an `Err` — they are
//! caught, logged, and recorded as warnings in the per-tick snapshot.
//! Programmer errors (`DuplicateName`, `DuplicateTaskId`, `UnknownProtocol`)
//! are raised synchronously at the offending call site and are allowed to
//! propagate within a process; the scheduler still catches them at the
//! process boundary so one misbehaving process cannot abort the tick.

use thiserror::Error;

/// The complete error taxonomy for the kernel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// A required host field was missing at tick entry. Fatal for the tick
    /// (no processes run) but a snapshot is still emitted.
    #[error("invalid host context: {reason}")]
    InvalidHostContext { reason: String },

    /// A registered process raised during its entry invocation.
    #[error("process '{name}' faulted ({kind}): {message}")]
    ProcessFault {
        name: String,
        kind: String,
        message: String,
    },

    /// A task body raised during a step.
    #[error("task '{id}' faulted: {message}")]
    TaskFault { id: String, message: String },

    /// Attempted to register a non-singleton descriptor whose name already
    /// exists.
    #[error("duplicate name: '{0}'")]
    DuplicateName(String),

    /// Attempted to create a task whose id is already in use by a
    /// non-terminal task.
    #[error("duplicate task id: '{0}'")]
    DuplicateTaskId(String),

    /// Looked up a protocol name that was never registered.
    #[error("unknown protocol: '{0}'")]
    UnknownProtocol(String),

    /// Advisory only: a CPU guard would have been exceeded. Never raised to
    /// the host; recorded in `snapshot.warnings`.
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    /// A task's generator instance did not survive a global reset while the
    /// task was `running`.
    #[error("state lost due to global reset: {0}")]
    StateLost(String),
}

impl KernelError {
    /// True for the variants that are recorded as warnings rather than
    /// propagated to a caller.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            KernelError::InvalidHostContext { .. }
                | KernelError::ProcessFault { .. }
                | KernelError::TaskFault { .. }
                | KernelError::BudgetExceeded(_)
                | KernelError::StateLost(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
