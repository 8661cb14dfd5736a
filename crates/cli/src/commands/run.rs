// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `bibsync run`: follow the push stream until interrupted.
//!
//! 1. Acquires the lock file so one connector runs per database
//! 2. Runs the subscription manager under the background task policy
//! 3. Stops cleanly on Ctrl-C

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::get_lock_path;
use crate::error::{Error, Result};
use crate::logging::setup_logging;
use crate::sync::{SubscriptionManager, WebSocketTransport};
use crate::task::{BackgroundTask, Environment, TaskOutcome};

use super::{build_orchestrator, log_path, open_db, subscription_config};

/// Name of the supervised subscription task.
pub const TASK_NAME: &str = "library-subscription";

pub fn run() -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    setup_logging(log_path(&work_dir, &config).as_deref());

    let environment = Environment::from_env()?;
    let lock_path = get_lock_path(&work_dir, &config);
    let _lock = acquire_lock(&lock_path)?;

    let sub_config = subscription_config(&config)?;
    let orchestrator = build_orchestrator(&work_dir, &config, db)?;
    let task = BackgroundTask {
        name: TASK_NAME.to_string(),
        run_in_dev: config.task.run_in_dev,
        restart: config.task.restart_delay(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                ctrl_c.cancel();
            }
        });

        task.run(environment, &cancel, || {
            let manager = SubscriptionManager::new(
                sub_config.clone(),
                WebSocketTransport::new(),
                Arc::clone(&orchestrator),
            );
            manager.run(cancel.clone())
        })
        .await
    });

    match outcome {
        TaskOutcome::Skipped => {
            println!(
                "Subscription not started in the {} environment (set task.run_in_dev to enable)",
                environment
            );
            Ok(())
        }
        TaskOutcome::Cancelled | TaskOutcome::Finished(Ok(())) => Ok(()),
        TaskOutcome::Finished(Err(e)) => Err(e.into()),
    }
}

/// Take the exclusive connector lock, failing if another process holds it.
pub(crate) fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::AlreadyRunning(lock_path.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
