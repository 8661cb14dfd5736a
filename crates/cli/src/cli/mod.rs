// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::{LimitArgs, OutputArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "bibsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mirror a Zotero group library into a local SQLite store")]
#[command(
    long_about = "Mirror a Zotero group library into a local SQLite store.\n\n\
    Catch-up passes pull every item changed since the last synchronized version; \
    `bibsync run` keeps the mirror current by following the library's push stream."
)]
pub struct Cli {
    /// Run as if bibsync was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a .bibsync directory for a group library
    #[command(after_help = "\
Examples:
  bibsync init --group 2556736                   Use BIBSYNC_API_KEY at run time
  bibsync init --group 2556736 --api-key KEY     Store the key in config.toml")]
    Init {
        /// Numeric id of the group library
        #[arg(long, short)]
        group: String,

        /// API key to store in the config
        #[arg(long)]
        api_key: Option<String>,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Follow the library's push stream until interrupted
    Run,

    /// Run one catch-up pass and print its summary
    Sync {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the sync cursor and entry count
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List synchronized entries by label
    Entries {
        #[command(flatten)]
        limits: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one entry by its item key
    Show {
        /// Remote item key
        key: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
