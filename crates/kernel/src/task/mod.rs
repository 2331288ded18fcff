// SPDX-License-Identifier: MIT

//! The cooperative task runner (spec.md §4.3): an unbounded set of
//! long-running bodies advanced one step per tick under a CPU budget.

mod body;
mod combinators;
mod runner;

pub use body::{BodyFactory, BoxedBody, Poll, StepCx, TaskBody};
pub use combinators::{all, filter, interval, map, race, repeat, retry, sequence, timeout, wait_ticks, wait_until, whilst};
pub use runner::{TaskOptions, TaskRecord, TaskRunReport, TaskRunner, TaskStatus};
