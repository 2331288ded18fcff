// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-core: shared types for the tick-driven cooperative kernel.
//!
//! This crate owns the vocabulary every other crate in the workspace
//! speaks: the [`HostContext`] trait the kernel is driven through, the
//! per-tick [`TickContext`] view assembled from it, the error taxonomy,
//! identifier helpers, and the kernel's tunable [`KernelConfig`].
//!
//! It does not know how to schedule a process, run a task, or persist
//! anything — that lives in `hive-kernel` and `hive-storage`.

pub mod config;
pub mod error;
pub mod host;
pub mod id;
pub mod time_fmt;
pub mod tick;

pub use config::KernelConfig;
pub use error::KernelError;
pub use host::{CpuSnapshot, HostContext, RoomView, SpawnView, WorkerView};
pub use id::{EntityId, IdGen, SequentialIdGen, ShortId, TaskId, UuidIdGen};
pub use tick::TickContext;
pub use time_fmt::{format_cpu, format_ticks};
