// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::SyncError;

/// All possible errors that can occur in the bibsync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'bibsync init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid group '{0}'\n  hint: a group id is the number in the library URL, e.g. /groups/2556736")]
    InvalidGroup(String),

    #[error("no API key configured\n  hint: set api_key in .bibsync/config.toml or export BIBSYNC_API_KEY")]
    MissingApiKey,

    #[error("invalid environment '{0}'\n  hint: valid environments are: development, production")]
    InvalidEnvironment(String),

    #[error("another connector is already running for {0}")]
    AlreadyRunning(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted data in database: {0}")]
    CorruptedData(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// A specialized Result type for bibsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<bibsync_core::Error> for Error {
    fn from(e: bibsync_core::Error) -> Self {
        match e {
            bibsync_core::Error::EntryNotFound(key) => Error::EntryNotFound(key),
            bibsync_core::Error::Database(e) => Error::Database(e),
            bibsync_core::Error::Io(e) => Error::Io(e),
            bibsync_core::Error::Json(e) => Error::Json(e),
            bibsync_core::Error::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
