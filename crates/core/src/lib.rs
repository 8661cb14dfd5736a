// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bibsync-core: Shared library for the bibsync connector
//!
//! This crate provides the data model for remote library items and their
//! local entries, the push-stream protocol frames, and the SQLite store that
//! holds the sync cursor and entries.

pub mod db;
pub mod entry;
pub mod error;
pub mod item;
pub mod protocol;

pub use db::Database;
pub use entry::{generate_entry_id, LocalEntry};
pub use error::{Error, Result};
pub use item::{strip_markup, ItemResponse, RemoteItemSnapshot};
pub use protocol::{library_topic, ClientFrame, ServerFrame, Subscription, SubscriptionFailure};
