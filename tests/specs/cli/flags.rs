// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for global flags.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn directory_flag_runs_elsewhere() {
    let temp = init_temp();
    let other = TempDir::new().unwrap();

    bibsync()
        .args(["-C"])
        .arg(temp.path())
        .arg("status")
        .current_dir(other.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Group: 42"));
}

#[test]
fn directory_flag_missing_path_fails() {
    let temp = TempDir::new().unwrap();

    bibsync()
        .args(["-C", "does/not/exist", "status"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot change to directory"));
}

#[test]
fn version_flag() {
    bibsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bibsync "));
}
