// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common options.

use clap::Args;

use super::OutputFormat;

/// Output format selection.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// Limit arguments for listed results.
#[derive(Args, Clone, Debug, Default)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(short = 'n', long, conflicts_with = "no_limit")]
    pub limit: Option<usize>,

    /// Show all results
    #[arg(long)]
    pub no_limit: bool,
}

impl LimitArgs {
    /// Default number of entries listed when no limit is given.
    pub const DEFAULT: usize = 100;

    /// The effective limit; `None` means unlimited.
    pub fn effective(&self) -> Option<usize> {
        if self.no_limit {
            None
        } else {
            Some(self.limit.unwrap_or(Self::DEFAULT))
        }
    }
}
