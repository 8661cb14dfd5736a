// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `bibsync entries` and `bibsync show`.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn empty_mirror_lists_nothing() {
    let temp = init_temp();

    bibsync()
        .arg("entries")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn empty_mirror_json_is_an_empty_array() {
    let temp = init_temp();

    let output = bibsync()
        .args(["entries", "--output", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn limit_conflicts_with_no_limit() {
    let temp = init_temp();

    bibsync()
        .args(["entries", "--limit", "5", "--no-limit"])
        .current_dir(temp.path())
        .assert()
        .failure();
}

#[test]
fn show_unknown_key_fails() {
    let temp = init_temp();

    bibsync()
        .args(["show", "ABCD2345"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry not found: ABCD2345"));
}
