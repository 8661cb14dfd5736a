// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One synchronization pass: cursor, delta, per-item fetch and upsert, cursor.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::api::LibraryApi;
use super::error::SyncError;
use super::store::SyncStore;

/// What happened to one changed key during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Upserted {
        key: String,
        uid: String,
        version: i64,
    },
    FetchFailed {
        key: String,
        reason: String,
    },
    StoreFailed {
        key: String,
        reason: String,
    },
}

impl ItemOutcome {
    pub fn key(&self) -> &str {
        match self {
            ItemOutcome::Upserted { key, .. }
            | ItemOutcome::FetchFailed { key, .. }
            | ItemOutcome::StoreFailed { key, .. } => key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Upserted { .. })
    }

    /// Why the item was not stored, for failed outcomes.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ItemOutcome::Upserted { .. } => None,
            ItemOutcome::FetchFailed { reason, .. } | ItemOutcome::StoreFailed { reason, .. } => {
                Some(reason)
            }
        }
    }
}

/// Result of a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Cursor when the pass started.
    pub from_version: i64,
    /// Cursor after the pass.
    pub to_version: i64,
    pub outcomes: Vec<ItemOutcome>,
}

impl PassSummary {
    pub fn upserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.upserted()
    }
}

/// Composes the library API and the local store into sync passes.
///
/// Passes never overlap: a pass requested while another runs waits for it
/// to finish, then runs in full against the updated cursor.
pub struct SyncOrchestrator<A, S> {
    api: A,
    store: S,
    pass_lock: Mutex<()>,
}

impl<A: LibraryApi, S: SyncStore> SyncOrchestrator<A, S> {
    pub fn new(api: A, store: S) -> Self {
        SyncOrchestrator {
            api,
            store,
            pass_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one full pass.
    ///
    /// Failures reading the cursor or fetching the delta abort the pass with
    /// the cursor unchanged. Per-item failures are recorded in the summary
    /// and do not stop the pass; the cursor still advances past them.
    pub async fn run_pass(&self) -> Result<PassSummary, SyncError> {
        let _guard = self.pass_lock.lock().await;

        let from_version = self.store.get_version()?;
        let delta = match self.api.fetch_changed_keys(from_version).await {
            Ok(delta) => delta,
            Err(e) => {
                warn!(since = from_version, error = %e, "failed to fetch library delta");
                return Err(e);
            }
        };
        info!(
            since = from_version,
            new_version = delta.new_version,
            changed = delta.keys.len(),
            "fetched library delta"
        );

        let mut outcomes = Vec::with_capacity(delta.keys.len());
        for (index, key) in delta.keys.iter().enumerate() {
            let fetched = match self.api.fetch_item(key).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to fetch item");
                    outcomes.push(ItemOutcome::FetchFailed {
                        key: key.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let outcome = match self.store.upsert(&fetched.snapshot) {
                Ok(entry) => {
                    debug!(key = %key, uid = %entry.uid, version = entry.version, "upserted entry");
                    ItemOutcome::Upserted {
                        key: key.clone(),
                        uid: entry.uid,
                        version: entry.version,
                    }
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to store item");
                    ItemOutcome::StoreFailed {
                        key: key.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);

            let more = index + 1 < delta.keys.len();
            if fetched.backoff_secs > 0 && more {
                info!(key = %key, seconds = fetched.backoff_secs, "backing off before next request");
                tokio::time::sleep(Duration::from_secs(fetched.backoff_secs)).await;
            }
        }

        let to_version = self.store.set_version(delta.new_version)?;
        let summary = PassSummary {
            from_version,
            to_version,
            outcomes,
        };
        info!(
            from = summary.from_version,
            to = summary.to_version,
            upserted = summary.upserted(),
            failed = summary.failed(),
            "sync pass complete"
        );
        Ok(summary)
    }
}
