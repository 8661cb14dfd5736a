// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The binary with the connector's environment variables cleared.
pub fn bibsync() -> Command {
    let mut cmd = cargo_bin_cmd!("bibsync");
    cmd.env_remove("BIBSYNC_API_KEY")
        .env_remove("BIBSYNC_ENV")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create an initialized temp directory for group 42.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    bibsync()
        .args(["init", "--group", "42"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Append raw TOML to the temp directory's config.
pub fn append_config(temp: &TempDir, toml: &str) {
    let path = temp.path().join(".bibsync/config.toml");
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push('\n');
    content.push_str(toml);
    std::fs::write(path, content).unwrap();
}
