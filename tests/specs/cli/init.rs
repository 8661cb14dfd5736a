// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `bibsync init`.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn creates_work_directory() {
    let temp = TempDir::new().unwrap();

    bibsync()
        .args(["init", "--group", "2556736"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized bibsync at"))
        .stdout(predicate::str::contains("Group: 2556736"))
        .stdout(predicate::str::contains("BIBSYNC_API_KEY"));

    assert!(temp.path().join(".bibsync/config.toml").exists());
    assert!(temp.path().join(".bibsync/library.db").exists());

    let config = std::fs::read_to_string(temp.path().join(".bibsync/config.toml")).unwrap();
    assert!(config.contains("group = \"2556736\""));
    assert!(!config.contains("api_key"));
}

#[test]
fn stores_api_key_when_given() {
    let temp = TempDir::new().unwrap();

    bibsync()
        .args(["init", "-g", "42", "--api-key", "secret"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("BIBSYNC_API_KEY").not());

    let config = std::fs::read_to_string(temp.path().join(".bibsync/config.toml")).unwrap();
    assert!(config.contains("api_key = \"secret\""));
}

#[test]
fn fails_if_already_initialized() {
    let temp = init_temp();

    bibsync()
        .args(["init", "--group", "42"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn path_option_initializes_elsewhere() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("mirror");
    std::fs::create_dir(&target).unwrap();

    bibsync()
        .args(["init", "--group", "42", "--path"])
        .arg(&target)
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(target.join(".bibsync/config.toml").exists());
    assert!(!temp.path().join(".bibsync").exists());
}

#[yare::parameterized(
    letters = { "mygroup" },
    fractional = { "1.5" },
    mixed = { "12ab" },
)]
fn rejects_non_numeric_group(group: &str) {
    let temp = TempDir::new().unwrap();

    bibsync()
        .args(["init", "--group", group])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid group"));

    assert!(!temp.path().join(".bibsync").exists());
}

#[test]
fn writes_gitignore() {
    let temp = init_temp();
    let gitignore = std::fs::read_to_string(temp.path().join(".bibsync/.gitignore")).unwrap();

    assert!(gitignore.contains("library.db"));
    assert!(gitignore.contains("connector.lock"));
    assert!(gitignore.contains("config.toml"));
}
