// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bibsync_core::{Database, LocalEntry, RemoteItemSnapshot};
use chrono::{TimeZone, Utc};

use super::api::{delta_from_versions, Delta, FetchedItem, LibraryApi};
use super::error::SyncError;
use super::store::{SharedDatabase, SyncStore};
use super::transport::BoxFuture;

/// Create a test snapshot for the given key and version.
pub fn snapshot(key: &str, version: i64) -> RemoteItemSnapshot {
    RemoteItemSnapshot {
        key: key.to_string(),
        library_id: 42,
        library_name: "Test Library".to_string(),
        version,
        url: format!("https://api.zotero.org/groups/42/items/{key}"),
        bib: format!("<div>{key} bib</div>"),
        citation: format!("<i>{key}</i> (2020)"),
        csljson: r#"{"type":"book"}"#.to_string(),
        created_by: "alice".to_string(),
        created_when: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        modified_by: "bob".to_string(),
        modified_when: Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct MockApiState {
    /// Remote library: key to version.
    versions: HashMap<String, i64>,
    delta_fails: bool,
    delta_delay: Option<Duration>,
    failing_items: HashSet<String>,
    backoff: HashMap<String, u64>,
    delta_calls: Vec<i64>,
    item_calls: Vec<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// In-memory remote library.
///
/// Clones share state, so a test can change the library or read the call
/// log while the code under test holds another clone.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockApiState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or change an item at the given version.
    pub fn set_item(&self, key: &str, version: i64) {
        self.state
            .lock()
            .unwrap()
            .versions
            .insert(key.to_string(), version);
    }

    pub fn fail_delta(&self, fail: bool) {
        self.state.lock().unwrap().delta_fails = fail;
    }

    /// Make each delta request take this long.
    pub fn delay_delta(&self, delay: Duration) {
        self.state.lock().unwrap().delta_delay = Some(delay);
    }

    pub fn fail_item(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_items
            .insert(key.to_string());
    }

    pub fn backoff_after(&self, key: &str, secs: u64) {
        self.state
            .lock()
            .unwrap()
            .backoff
            .insert(key.to_string(), secs);
    }

    /// The `since` argument of every delta request, in order.
    pub fn delta_calls(&self) -> Vec<i64> {
        self.state.lock().unwrap().delta_calls.clone()
    }

    pub fn item_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().item_calls.clone()
    }

    /// Most delta requests ever observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }
}

impl LibraryApi for MockApi {
    fn fetch_changed_keys(&self, since: i64) -> BoxFuture<'_, Result<Delta, SyncError>> {
        Box::pin(async move {
            let delay = {
                let mut state = self.state.lock().unwrap();
                state.delta_calls.push(since);
                state.in_flight += 1;
                state.max_in_flight = state.max_in_flight.max(state.in_flight);
                state.delta_delay
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut state = self.state.lock().unwrap();
            state.in_flight -= 1;
            if state.delta_fails {
                return Err(SyncError::RemoteUnavailable("HTTP 503".into()));
            }
            let changed = state
                .versions
                .iter()
                .filter(|(_, v)| **v > since)
                .map(|(k, v)| (k.clone(), *v))
                .collect();
            Ok(delta_from_versions(since, changed))
        })
    }

    fn fetch_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<FetchedItem, SyncError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.item_calls.push(key.to_string());
            if state.failing_items.contains(key) {
                return Err(SyncError::ItemFetch {
                    key: key.to_string(),
                    reason: "HTTP 500".into(),
                });
            }
            let version = state.versions.get(key).copied().unwrap_or(0);
            Ok(FetchedItem {
                snapshot: snapshot(key, version),
                backoff_secs: state.backoff.get(key).copied().unwrap_or(0),
            })
        })
    }
}

/// Store whose upserts fail for chosen keys.
#[derive(Clone)]
pub struct FailingStore {
    pub inner: SharedDatabase,
    failing: Arc<HashSet<String>>,
}

impl FailingStore {
    pub fn new(keys: &[&str]) -> Self {
        FailingStore {
            inner: SharedDatabase::new(Database::open_in_memory().unwrap()),
            failing: Arc::new(keys.iter().map(|k| k.to_string()).collect()),
        }
    }
}

impl SyncStore for FailingStore {
    fn get_version(&self) -> bibsync_core::Result<i64> {
        self.inner.get_version()
    }

    fn set_version(&self, version: i64) -> bibsync_core::Result<i64> {
        self.inner.set_version(version)
    }

    fn upsert(&self, snapshot: &RemoteItemSnapshot) -> bibsync_core::Result<LocalEntry> {
        if self.failing.contains(&snapshot.key) {
            return Err(bibsync_core::Error::CorruptedData(format!(
                "refusing {}",
                snapshot.key
            )));
        }
        self.inner.upsert(snapshot)
    }
}
