// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locally persisted library entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Generate a local entry ID from the remote key and creation time.
/// Format: `ent-{hash}` where hash is the first 32 hex chars of SHA256(key + timestamp)
pub fn generate_entry_id(item_key: &str, created_at: &DateTime<Utc>) -> String {
    let input = format!(
        "{}{}",
        item_key,
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("ent-{}", hex::encode(&hash[..16]))
}

/// A library entry as stored locally.
///
/// `uid` is assigned on first sync and never changes; every other field is
/// overwritten with the latest remote values on each sync of the same key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalEntry {
    pub uid: String,
    pub item_key: String,
    pub label: String,
    pub version: i64,
    pub url: String,
    pub csljson: String,
    pub bib: String,
    pub citation: String,
    pub created_by: String,
    pub created_when: DateTime<Utc>,
    pub modified_by: String,
    pub modified_when: DateTime<Utc>,
    /// Local time of the most recent upsert.
    pub synced_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
