// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `bibsync run` that need no network.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn skipped_in_development() {
    let temp = init_temp();

    bibsync()
        .arg("run")
        .env("BIBSYNC_ENV", "development")
        .env("BIBSYNC_API_KEY", "secret")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("not started in the development environment"));
}

#[test]
fn requires_api_key() {
    let temp = init_temp();

    bibsync()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn rejects_unknown_environment() {
    let temp = init_temp();

    bibsync()
        .arg("run")
        .env("BIBSYNC_ENV", "staging")
        .env("BIBSYNC_API_KEY", "secret")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid environment 'staging'"));
}

#[test]
fn fails_outside_a_mirror() {
    let temp = TempDir::new().unwrap();

    bibsync()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
