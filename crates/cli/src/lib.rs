// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bibsync - mirror a remote group library into a local SQLite store.
//!
//! This crate provides the `bibsync` CLI. The storage layer lives in
//! `bibsync-core`; this crate adds the REST client, the push-stream
//! subscription and the commands that drive them.
//!
//! # Main Components
//!
//! - [`sync`] - Catch-up orchestration and the push-stream subscription manager
//! - [`Config`] - Connector configuration (group, key, endpoints, timings)
//! - [`task`] - Environment-aware supervision of the long-running subscription
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! ```rust,ignore
//! use bibsync::{find_work_dir, get_db_path, init_work_dir, Config};
//!
//! let work_dir = init_work_dir(Path::new("."), "2556736", None)?;
//!
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! let db = bibsync_core::Database::open(&get_db_path(&work_dir, &config))?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;
pub mod task;

pub use cli::{Cli, Command, LimitArgs, OutputArgs, OutputFormat};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init {
            group,
            api_key,
            path,
        } => commands::init::run(group, api_key, path),
        Command::Run => commands::run::run(),
        Command::Sync { output } => commands::sync::run(output.output),
        Command::Status { output } => commands::status::run(output.output),
        Command::Entries { limits, output } => {
            commands::entries::list(limits.effective(), output.output)
        }
        Command::Show { key, output } => commands::entries::show(&key, output.output),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bibsync", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
