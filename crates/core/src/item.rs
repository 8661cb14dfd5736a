// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote library items.
//!
//! [`ItemResponse`] mirrors the parts of the item payload the connector reads;
//! everything else the API returns is ignored. [`RemoteItemSnapshot`] is the
//! flattened form handed to the upserter.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Anything between angle brackets is markup, matched lazily so adjacent tags
// are removed one at a time.
static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"<[^<]+?>") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// Remove every `<...>` tag from a rendered citation, leaving the text between them.
pub fn strip_markup(text: &str) -> String {
    MARKUP_RE.replace_all(text, "").into_owned()
}

/// Item payload as returned with `format=json&include=bib,data,citation,csljson`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemResponse {
    pub key: String,
    pub version: i64,
    pub library: Library,
    pub links: Links,
    pub meta: Meta,
    pub bib: String,
    pub citation: String,
    pub csljson: serde_json::Value,
    pub data: ItemData,
}

/// The library owning an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub created_by_user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by_user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub username: String,
}

/// The item's editable data; only the timestamps are consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// One remote item at the version it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteItemSnapshot {
    pub key: String,
    pub library_id: i64,
    pub library_name: String,
    pub version: i64,
    pub url: String,
    pub bib: String,
    pub citation: String,
    /// Structured citation payload, kept as JSON text.
    pub csljson: String,
    pub created_by: String,
    pub created_when: DateTime<Utc>,
    /// Empty when the API does not report a last modifier.
    pub modified_by: String,
    pub modified_when: DateTime<Utc>,
}

impl RemoteItemSnapshot {
    /// Decode a snapshot from the raw item response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let response: ItemResponse = serde_json::from_str(body)?;
        Ok(response.into())
    }

    /// Human-readable label: the short citation with its markup removed.
    pub fn label(&self) -> String {
        strip_markup(&self.citation)
    }
}

impl From<ItemResponse> for RemoteItemSnapshot {
    fn from(item: ItemResponse) -> Self {
        RemoteItemSnapshot {
            key: item.key,
            library_id: item.library.id,
            library_name: item.library.name,
            version: item.version,
            url: item.links.self_link.href,
            bib: item.bib,
            citation: item.citation,
            csljson: item.csljson.to_string(),
            created_by: item.meta.created_by_user.username,
            created_when: item.data.date_added,
            modified_by: item
                .meta
                .last_modified_by_user
                .map(|u| u.username)
                .unwrap_or_default(),
            modified_when: item.data.date_modified,
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
