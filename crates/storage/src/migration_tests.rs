// SPDX-License-Identifier: MIT

use super::*;
use serde_json::Map;

#[test]
fn fresh_root_migrates_from_zero() {
    let mut root = Map::new();
    let found = migrate(&mut root);
    assert_eq!(found, 0);
    assert_eq!(
        root.get(crate::fields::SCHEMA_VERSION).and_then(|v| v.as_u64()),
        Some(CURRENT_VERSION as u64)
    );
}

#[test]
fn already_current_root_is_idempotent() {
    let mut root = Map::new();
    migrate(&mut root);
    let found = migrate(&mut root);
    assert_eq!(found, CURRENT_VERSION);
}
