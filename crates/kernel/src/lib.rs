// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-kernel: the tick-driven cooperative kernel.
//!
//! [`Kernel::run_tick`] is the single entry point a host calls once per
//! tick. Everything else in this crate is a collaborator it owns: a
//! priority-ordered [`process`] scheduler, a typed [`protocol`] registry,
//! a cooperative [`task`] runner, a config-driven [`state_machine`]
//! interpreter, phased [`init`]ialization, [`respawn`] detection, and the
//! [`metrics`] and [`memory`] housekeeping that round out one tick.

pub mod init;
pub mod kernel;
pub mod memory;
pub mod metrics;
pub mod process;
pub mod protocol;
pub mod respawn;
pub mod state_machine;
pub mod task;

pub use init::{InitOutcome, InitPhase, InitializationManager};
pub use kernel::{Kernel, TickReport};
pub use memory::{build_role_counts, prune_stale_workers};
pub use metrics::{build_snapshot, SnapshotInputs};
pub use process::{ProcessCx, ProcessEntry, ProcessError, ProcessOutcome, ProcessRegistry, SchedulerReport};
pub use protocol::{
    names, BehaviorCoordination, BehaviorSummary, BootstrapCoordination, BootstrapStatus, HealthMetrics,
    HealthMonitoring, MemoryUtil, MetricsCoordination, Protocol, ProtocolRegistry, RoleManagement, StateCoordination,
};
pub use respawn::detect_fresh_world;
pub use state_machine::{Event, StateConfig, StateMachineConfig, StateMachineInstance, Transition};
pub use task::{
    all, filter, interval, map, race, repeat, retry, sequence, timeout, wait_ticks, wait_until, whilst, BodyFactory,
    BoxedBody, Poll, StepCx, TaskBody, TaskOptions, TaskRecord, TaskRunReport, TaskRunner, TaskStatus,
};
