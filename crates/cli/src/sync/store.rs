// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local persistence seen by a sync pass: the cursor and the entry upsert.

use std::sync::{Arc, Mutex, MutexGuard};

use bibsync_core::{Database, LocalEntry, RemoteItemSnapshot, Result};

/// Cursor and entry storage used by the orchestrator.
pub trait SyncStore: Send + Sync {
    /// Current cursor, created at 0 on first use.
    fn get_version(&self) -> Result<i64>;

    /// Advance the cursor; returns the stored value.
    fn set_version(&self, version: i64) -> Result<i64>;

    /// Create or overwrite the entry for the snapshot's key.
    fn upsert(&self, snapshot: &RemoteItemSnapshot) -> Result<LocalEntry>;
}

/// A [`Database`] shared between the sync engine and whoever opened it.
#[derive(Clone)]
pub struct SharedDatabase(Arc<Mutex<Database>>);

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        SharedDatabase(Arc::new(Mutex::new(db)))
    }

    /// Lock the database. A panic in another holder leaves the connection
    /// usable, so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, Database> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SyncStore for SharedDatabase {
    fn get_version(&self) -> Result<i64> {
        self.lock().get_version()
    }

    fn set_version(&self, version: i64) -> Result<i64> {
        self.lock().set_version(version)
    }

    fn upsert(&self, snapshot: &RemoteItemSnapshot) -> Result<LocalEntry> {
        self.lock().upsert_entry(snapshot)
    }
}
