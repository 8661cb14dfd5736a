// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed store for the sync cursor and library entries.
//!
//! The [`Database`] struct owns the connection. Every write runs inside its
//! own transaction so a failed statement leaves nothing half-applied.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::entry::{generate_entry_id, LocalEntry};
use crate::error::{Error, Result};
use crate::item::RemoteItemSnapshot;

/// SQL schema for the sync database.
pub const SCHEMA: &str = r#"
-- Singleton row holding the last fully synchronized library version
CREATE TABLE IF NOT EXISTS sync_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT
);

-- One row per remote item, keyed by the remote item key
CREATE TABLE IF NOT EXISTS entries (
    uid TEXT PRIMARY KEY,
    item_key TEXT NOT NULL UNIQUE,
    label TEXT NOT NULL,
    version INTEGER NOT NULL,
    url TEXT NOT NULL,
    csljson TEXT NOT NULL,
    bib TEXT NOT NULL,
    citation TEXT NOT NULL,
    created_by TEXT NOT NULL,
    created_when TEXT NOT NULL,
    modified_by TEXT NOT NULL,
    modified_when TEXT NOT NULL,
    synced_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_label ON entries(label);
"#;

const ENTRY_COLUMNS: &str = "uid, item_key, label, version, url, csljson, bib, citation, \
     created_by, created_when, modified_by, modified_when, synced_at";

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Map a row selected with [`ENTRY_COLUMNS`] to an entry.
fn entry_from_row(row: &Row<'_>) -> std::result::Result<LocalEntry, rusqlite::Error> {
    let created_str: String = row.get(9)?;
    let modified_str: String = row.get(11)?;
    let synced_str: String = row.get(12)?;

    Ok(LocalEntry {
        uid: row.get(0)?,
        item_key: row.get(1)?,
        label: row.get(2)?,
        version: row.get(3)?,
        url: row.get(4)?,
        csljson: row.get(5)?,
        bib: row.get(6)?,
        citation: row.get(7)?,
        created_by: row.get(8)?,
        created_when: parse_timestamp(&created_str, "created_when")?,
        modified_by: row.get(10)?,
        modified_when: parse_timestamp(&modified_str, "modified_when")?,
        synced_at: parse_timestamp(&synced_str, "synced_at")?,
    })
}

/// Apply the schema. Safe to run on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with cursor and entry operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Current library version, creating the cursor at 0 on first use.
    pub fn get_version(&mut self) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let version: i64 = tx.query_row(
            "INSERT INTO sync_state (id, version) VALUES (1, 0)
             ON CONFLICT(id) DO UPDATE SET version = version
             RETURNING version",
            [],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(version)
    }

    /// Store a new library version and return the stored value.
    ///
    /// The cursor never moves backwards: a version lower than the stored one
    /// leaves it unchanged.
    pub fn set_version(&mut self, version: i64) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let stored: i64 = tx.query_row(
            "INSERT INTO sync_state (id, version, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                 version = MAX(version, excluded.version),
                 updated_at = excluded.updated_at
             RETURNING version",
            params![version, Utc::now().to_rfc3339()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(stored)
    }

    /// When the cursor was last written, if ever.
    pub fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT updated_at FROM sync_state WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match value.flatten() {
            Some(s) => Ok(Some(parse_timestamp(&s, "updated_at")?)),
            None => Ok(None),
        }
    }

    /// Create or overwrite the entry for the snapshot's key in one statement.
    ///
    /// A new entry gets a fresh `uid`; an existing entry keeps its `uid` and
    /// has every other column replaced.
    pub fn upsert_entry(&mut self, snapshot: &RemoteItemSnapshot) -> Result<LocalEntry> {
        let now = Utc::now();
        let uid = generate_entry_id(&snapshot.key, &now);
        let sql = format!(
            "INSERT INTO entries ({ENTRY_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(item_key) DO UPDATE SET
                 label = excluded.label,
                 version = excluded.version,
                 url = excluded.url,
                 csljson = excluded.csljson,
                 bib = excluded.bib,
                 citation = excluded.citation,
                 created_by = excluded.created_by,
                 created_when = excluded.created_when,
                 modified_by = excluded.modified_by,
                 modified_when = excluded.modified_when,
                 synced_at = excluded.synced_at
             RETURNING {ENTRY_COLUMNS}"
        );

        let tx = self.conn.transaction()?;
        let entry = tx.query_row(
            &sql,
            params![
                uid,
                snapshot.key,
                snapshot.label(),
                snapshot.version,
                snapshot.url,
                snapshot.csljson,
                snapshot.bib,
                snapshot.citation,
                snapshot.created_by,
                snapshot.created_when.to_rfc3339(),
                snapshot.modified_by,
                snapshot.modified_when.to_rfc3339(),
                now.to_rfc3339(),
            ],
            entry_from_row,
        )?;
        tx.commit()?;
        Ok(entry)
    }

    /// Get an entry by its remote item key.
    pub fn get_entry(&self, item_key: &str) -> Result<LocalEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE item_key = ?1");
        self.conn
            .query_row(&sql, params![item_key], entry_from_row)
            .optional()?
            .ok_or_else(|| Error::EntryNotFound(item_key.to_string()))
    }

    /// List entries ordered by label, optionally limited.
    pub fn list_entries(&self, limit: Option<usize>) -> Result<Vec<LocalEntry>> {
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY label COLLATE NOCASE, item_key LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![limit], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of stored entries.
    pub fn count_entries(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
