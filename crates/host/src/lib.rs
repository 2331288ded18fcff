// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-host: in-memory [`hive_core::HostContext`] test double.
//!
//! A real binding wires the kernel to an actual host's `Game`/`Memory`
//! globals; that binding is out of scope here (spec.md §1). This crate
//! gives tests and the sandbox binary something to drive the kernel
//! through without one.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHostContext;
