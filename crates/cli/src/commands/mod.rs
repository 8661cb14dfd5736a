// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod entries;
pub mod init;
pub mod run;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use bibsync_core::Database;

use crate::config::{find_work_dir, get_archive_dir, get_db_path, Config};
use crate::error::Result;
use crate::sync::{
    ApiConfig, HttpLibraryApi, SharedDatabase, SubscriptionConfig, SyncOrchestrator,
};

/// Orchestrator over the real REST API and the local database.
pub type LiveOrchestrator = SyncOrchestrator<HttpLibraryApi, SharedDatabase>;

/// Find and load the configuration, with environment overrides applied.
pub fn load_config() -> Result<(Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?.with_env_overrides();
    Ok((config, work_dir))
}

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let (config, work_dir) = load_config()?;
    let db_path = get_db_path(&work_dir, &config);
    let db = Database::open(&db_path)?;
    Ok((db, config, work_dir))
}

/// Build the orchestrator a pass or subscription runs against.
pub fn build_orchestrator(
    work_dir: &std::path::Path,
    config: &Config,
    db: Database,
) -> Result<Arc<LiveOrchestrator>> {
    let api = HttpLibraryApi::new(ApiConfig {
        base_url: config.remote.api_url.clone(),
        group: config.group.clone(),
        api_key: config.require_api_key()?.to_string(),
        request_timeout: std::time::Duration::from_secs(config.remote.request_timeout_secs),
        archive_dir: get_archive_dir(work_dir, config),
    })?;
    Ok(Arc::new(SyncOrchestrator::new(
        api,
        SharedDatabase::new(db),
    )))
}

/// Stream settings derived from the configuration.
pub fn subscription_config(config: &Config) -> Result<SubscriptionConfig> {
    Ok(SubscriptionConfig {
        url: config.stream.url.clone(),
        api_key: config.require_api_key()?.to_string(),
        group: config.group.clone(),
        auth_timeout: config.stream.auth_timeout(),
        retry_delay: config.stream.retry_delay(),
    })
}

/// Resolve the configured log file, relative paths against the project root.
pub fn log_path(work_dir: &std::path::Path, config: &Config) -> Option<PathBuf> {
    config.log_file.as_ref().map(|file| {
        let path = std::path::Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            work_dir.parent().unwrap_or(work_dir).join(path)
        }
    })
}
