// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use bibsync_core::{Database, LocalEntry};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::open_db;

pub fn list(limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    list_impl(&db, limit, format, &mut std::io::stdout())
}

pub fn show(key: &str, format: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    show_impl(&db, key, format, &mut std::io::stdout())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn list_impl(
    db: &Database,
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let entries = db.list_entries(limit)?;
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}  v{}  {}", entry.item_key, entry.version, entry.label)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn show_impl(
    db: &Database,
    key: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let entry = db.get_entry(key)?;
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
        }
        OutputFormat::Text => write_entry_details(&entry, out)?,
    }
    Ok(())
}

fn write_entry_details(entry: &LocalEntry, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", entry.label)?;
    writeln!(out, "Key: {}", entry.item_key)?;
    writeln!(out, "Uid: {}", entry.uid)?;
    writeln!(out, "Version: {}", entry.version)?;
    writeln!(out, "Url: {}", entry.url)?;
    writeln!(
        out,
        "Created: {} by {}",
        entry.created_when.format("%Y-%m-%d %H:%M"),
        entry.created_by
    )?;
    if entry.modified_by.is_empty() {
        writeln!(out, "Modified: {}", entry.modified_when.format("%Y-%m-%d %H:%M"))?;
    } else {
        writeln!(
            out,
            "Modified: {} by {}",
            entry.modified_when.format("%Y-%m-%d %H:%M"),
            entry.modified_by
        )?;
    }
    writeln!(out, "Synced: {}", entry.synced_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    Ok(())
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
