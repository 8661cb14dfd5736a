// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use bibsync_core::Database;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;

use super::open_db;

#[derive(Debug, Serialize)]
struct StatusReport {
    group: String,
    version: i64,
    entries: i64,
    last_synced_at: Option<DateTime<Utc>>,
}

pub fn run(format: OutputFormat) -> Result<()> {
    let (mut db, config, _) = open_db()?;
    run_impl(&mut db, &config, format, &mut std::io::stdout())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(
    db: &mut Database,
    config: &Config,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let report = StatusReport {
        group: config.group.clone(),
        version: db.get_version()?,
        entries: db.count_entries()?,
        last_synced_at: db.last_synced_at()?,
    };

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Group: {}", report.group)?;
            writeln!(out, "Library version: {}", report.version)?;
            writeln!(out, "Entries: {}", report.entries)?;
            match report.last_synced_at {
                Some(at) => writeln!(out, "Last synced: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?,
                None => writeln!(out, "Last synced: never")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
