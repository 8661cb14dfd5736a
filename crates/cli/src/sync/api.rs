// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST access to the remote library: the delta and item endpoints.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use bibsync_core::RemoteItemSnapshot;
use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use super::error::SyncError;
use super::transport::BoxFuture;

const API_VERSION_HEADER: &str = "Zotero-API-Version";
const API_VERSION: &str = "3";
const BACKOFF_HEADER: &str = "Backoff";

/// Keys changed since a cursor, and the version to advance the cursor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub keys: Vec<String>,
    pub new_version: i64,
}

/// One fetched item plus the server's rate-limit guidance.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedItem {
    pub snapshot: RemoteItemSnapshot,
    /// Seconds to wait before the next request, 0 when none was asked.
    pub backoff_secs: u64,
}

/// Build a [`Delta`] from a `format=versions` response.
///
/// Keys are ordered by version, then key. `new_version` is the highest
/// version seen, or `since` when nothing changed.
pub fn delta_from_versions(since: i64, versions: HashMap<String, i64>) -> Delta {
    let new_version = versions.values().copied().max().unwrap_or(since);
    let mut pairs: Vec<(String, i64)> = versions.into_iter().collect();
    pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Delta {
        keys: pairs.into_iter().map(|(key, _)| key).collect(),
        new_version,
    }
}

/// Parse a `Backoff` header value; anything unusable means no backoff.
pub fn parse_backoff(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Item keys are short alphanumeric ids; anything else is not used as a file name.
pub fn is_valid_item_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Remote library operations used by a sync pass.
pub trait LibraryApi: Send + Sync {
    /// Keys changed since `since`, with the new maximum version.
    fn fetch_changed_keys(&self, since: i64) -> BoxFuture<'_, Result<Delta, SyncError>>;

    /// Full representation of one item.
    fn fetch_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<FetchedItem, SyncError>>;
}

/// Settings for [`HttpLibraryApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.zotero.org`.
    pub base_url: String,
    pub group: String,
    pub api_key: String,
    pub request_timeout: Duration,
    /// Where raw item bodies are archived, if anywhere.
    pub archive_dir: Option<PathBuf>,
}

/// [`LibraryApi`] over HTTPS with bearer authentication.
pub struct HttpLibraryApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpLibraryApi {
    pub fn new(config: ApiConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("bibsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;
        Ok(HttpLibraryApi { client, config })
    }

    fn items_url(&self) -> String {
        format!(
            "{}/groups/{}/items",
            self.config.base_url.trim_end_matches('/'),
            self.config.group
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn changed_keys(&self, since: i64) -> Result<Delta, SyncError> {
        let url = format!("{}/", self.items_url());
        let response = self
            .get(&url)
            .query(&[("since", since.to_string()), ("format", "versions".into())])
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::RemoteUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let versions: HashMap<String, i64> = response
            .json()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("invalid versions body: {e}")))?;

        Ok(delta_from_versions(since, versions))
    }

    async fn item(&self, key: &str) -> Result<FetchedItem, SyncError> {
        let fail = |reason: String| SyncError::ItemFetch {
            key: key.to_string(),
            reason,
        };

        let url = format!("{}/{}/", self.items_url(), key);
        let response = self
            .get(&url)
            .query(&[("format", "json"), ("include", "bib,data,citation,csljson")])
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let backoff_secs = backoff_from_headers(response.headers());
        let body = response.text().await.map_err(|e| fail(e.to_string()))?;
        let snapshot = RemoteItemSnapshot::from_json(&body).map_err(|e| fail(e.to_string()))?;

        if let Some(dir) = &self.config.archive_dir {
            archive_item(dir, key, &body).await;
        }

        Ok(FetchedItem {
            snapshot,
            backoff_secs,
        })
    }
}

fn backoff_from_headers(headers: &HeaderMap) -> u64 {
    parse_backoff(headers.get(BACKOFF_HEADER).and_then(|v| v.to_str().ok()))
}

/// Write the raw item body to `{dir}/{key}.json`. Failures are logged only.
pub(super) async fn archive_item(dir: &std::path::Path, key: &str, body: &str) {
    if !is_valid_item_key(key) {
        warn!(key, "not archiving item with a non-alphanumeric key");
        return;
    }
    let path = dir.join(format!("{key}.json"));
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, body).await
    }
    .await;

    match result {
        Ok(()) => debug!(key, path = %path.display(), "archived item"),
        Err(e) => warn!(key, path = %path.display(), error = %e, "failed to archive item"),
    }
}

impl LibraryApi for HttpLibraryApi {
    fn fetch_changed_keys(&self, since: i64) -> BoxFuture<'_, Result<Delta, SyncError>> {
        Box::pin(self.changed_keys(since))
    }

    fn fetch_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<FetchedItem, SyncError>> {
        Box::pin(self.item(key))
    }
}
