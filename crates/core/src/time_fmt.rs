// SPDX-License-Identifier: MIT

//! Shared human-readable formatting for tick spans and CPU costs, used in
//! warning messages and log fields.

/// Format a tick count as a short human-readable span: `"5t"`, `"120t"`.
/// Kept intentionally simple — unlike wall-clock durations, a "tick" has no
/// fixed real-world length, so there is no minute/hour/day rollup.
pub fn format_ticks(ticks: u64) -> String {
    format!("{ticks}t")
}

/// Format a CPU-time value (in the host's arbitrary CPU units) to two
/// decimal places, e.g. `"4.32cpu"`.
pub fn format_cpu(amount: f64) -> String {
    format!("{amount:.2}cpu")
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
