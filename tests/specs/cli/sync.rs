// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `bibsync sync` against an unreachable endpoint.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn requires_api_key() {
    let temp = init_temp();

    bibsync()
        .arg("sync")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn unreachable_remote_leaves_cursor_unchanged() {
    let temp = init_temp();
    append_config(
        &temp,
        "[remote]\napi_url = \"http://127.0.0.1:1\"\nrequest_timeout_secs = 2\n",
    );

    bibsync()
        .arg("sync")
        .env("BIBSYNC_API_KEY", "secret")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote unavailable"));

    bibsync()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Library version: 0"));
}
