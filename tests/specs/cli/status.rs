// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `bibsync status`.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn fresh_mirror_starts_at_version_zero() {
    let temp = init_temp();

    bibsync()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Group: 42"))
        .stdout(predicate::str::contains("Library version: 0"))
        .stdout(predicate::str::contains("Entries: 0"))
        .stdout(predicate::str::contains("Last synced: never"));
}

#[test]
fn json_output() {
    let temp = init_temp();

    let output = bibsync()
        .args(["status", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["group"], "42");
    assert_eq!(json["version"], 0);
    assert_eq!(json["entries"], 0);
}

#[test]
fn fails_outside_a_mirror() {
    let temp = TempDir::new().unwrap();

    bibsync()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn found_from_subdirectory() {
    let temp = init_temp();
    let nested = temp.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    bibsync()
        .arg("status")
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("Group: 42"));
}
