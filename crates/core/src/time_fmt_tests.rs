// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn format_ticks_appends_unit() {
    assert_eq!(format_ticks(5), "5t");
    assert_eq!(format_ticks(0), "0t");
}

#[test]
fn format_cpu_rounds_to_two_decimals() {
    assert_eq!(format_cpu(4.321), "4.32cpu");
    assert_eq!(format_cpu(0.0), "0.00cpu");
}
