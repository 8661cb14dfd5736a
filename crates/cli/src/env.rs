// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule. Values are read once, when a command builds its
//! configuration, never from inside the sync engine.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `BIBSYNC_API_KEY` if set and non-empty.
pub fn api_key() -> Option<String> {
    std::env::var(vars::BIBSYNC_API_KEY)
        .ok()
        .filter(|v| !v.is_empty())
}

/// Returns the value of `BIBSYNC_ENV` if set.
pub fn environment() -> Option<String> {
    std::env::var(vars::BIBSYNC_ENV).ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
