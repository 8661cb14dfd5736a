// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::setup_logging;
use crate::sync::PassSummary;

use super::{build_orchestrator, log_path, open_db};

#[derive(Serialize)]
struct FailedItem<'a> {
    key: &'a str,
    reason: &'a str,
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    from_version: i64,
    to_version: i64,
    upserted: usize,
    failed: Vec<FailedItem<'a>>,
}

pub fn run(format: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    setup_logging(log_path(&work_dir, &config).as_deref());

    let orchestrator = build_orchestrator(&work_dir, &config, db)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(orchestrator.run_pass())?;

    write_summary(&summary, format, &mut std::io::stdout())
}

pub(crate) fn write_summary(
    summary: &PassSummary,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let failed: Vec<FailedItem<'_>> = summary
        .outcomes
        .iter()
        .filter_map(|outcome| {
            outcome.failure_reason().map(|reason| FailedItem {
                key: outcome.key(),
                reason,
            })
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let report = SummaryReport {
                from_version: summary.from_version,
                to_version: summary.to_version,
                upserted: summary.upserted(),
                failed,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "Synced version {} -> {}: {} upserted, {} failed",
                summary.from_version,
                summary.to_version,
                summary.upserted(),
                failed.len()
            )?;
            for item in &failed {
                writeln!(out, "  {}: {}", item.key, item.reason)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
