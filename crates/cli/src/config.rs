// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connector configuration management.
//!
//! Configuration is stored in `.bibsync/config.toml` and includes:
//! - `group`: The numeric id of the group library to mirror
//! - `api_key`: Key used for REST calls and the stream subscription
//!   (overridden by `BIBSYNC_API_KEY`)
//! - `database`: Optional path to store the database in a different location
//! - `[remote]`, `[stream]`, `[task]`: endpoint and timing settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".bibsync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "library.db";
const LOCK_FILE_NAME: &str = "connector.lock";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Connector configuration stored in `.bibsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Numeric group library id, e.g. "2556736".
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional path for the database (relative to the project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// When set, the raw JSON of every fetched item is written here as `{key}.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_dir: Option<String>,
    /// Log to this file instead of stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub task: TaskConfig,
}

/// REST endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Push-stream settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamConfig {
    #[serde(default = "default_stream_url")]
    pub url: String,
    /// Max time to wait for the subscription confirmation (default: 10).
    #[serde(default = "default_auth_timeout_secs")]
    pub auth_timeout_secs: u64,
    /// Delay before reconnecting after a transport failure (default: 10).
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            url: default_stream_url(),
            auth_timeout_secs: default_auth_timeout_secs(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl StreamConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// How `bibsync run` supervises the subscription task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskConfig {
    /// Run the subscription even when `BIBSYNC_ENV=development`.
    #[serde(default)]
    pub run_in_dev: bool,
    /// Restart the subscription after it ends.
    #[serde(default)]
    pub restart: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_delay_secs: Option<u64>,
}

impl TaskConfig {
    /// Delay before a restart, or `None` when restarts are disabled.
    pub fn restart_delay(&self) -> Option<Duration> {
        self.restart.then(|| {
            Duration::from_secs(
                self.restart_delay_secs
                    .unwrap_or_else(default_restart_delay_secs),
            )
        })
    }
}

fn default_api_url() -> String {
    "https://api.zotero.org".to_string()
}

fn default_stream_url() -> String {
    "wss://stream.zotero.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_auth_timeout_secs() -> u64 {
    10
}

fn default_retry_delay_secs() -> u64 {
    10
}

fn default_restart_delay_secs() -> u64 {
    30
}

/// A group id is a non-empty run of ASCII digits.
pub fn validate_group(group: &str) -> bool {
    !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit())
}

impl Config {
    /// Creates a new config for the given group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGroup`] if the group is not numeric.
    pub fn new(group: String, api_key: Option<String>) -> Result<Self> {
        if !validate_group(&group) {
            return Err(Error::InvalidGroup(group));
        }
        Ok(Config {
            group,
            api_key,
            database: None,
            archive_dir: None,
            log_file: None,
            remote: RemoteConfig::default(),
            stream: StreamConfig::default(),
            task: TaskConfig::default(),
        })
    }

    /// Loads configuration from the given `.bibsync/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if !validate_group(&config.group) {
            return Err(Error::InvalidGroup(config.group));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.bibsync/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Applies `BIBSYNC_API_KEY` over the file's key.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env::api_key() {
            self.api_key = Some(key);
        }
        self
    }

    /// The API key, or [`Error::MissingApiKey`] when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingApiKey)
    }
}

/// Find the .bibsync directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.join(CONFIG_FILE_NAME).is_file() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path from config
pub fn get_db_path(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.database {
        Some(database) => {
            let database_path = Path::new(database);
            if database_path.is_absolute() {
                database_path.to_path_buf()
            } else {
                // Relative to the project root
                work_dir.parent().unwrap_or(work_dir).join(database)
            }
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// The single-instance lock file, kept beside the database.
pub fn get_lock_path(work_dir: &Path, config: &Config) -> PathBuf {
    let db_path = get_db_path(work_dir, config);
    db_path
        .parent()
        .unwrap_or(work_dir)
        .join(LOCK_FILE_NAME)
}

/// Resolve the archive directory, relative paths against the project root.
pub fn get_archive_dir(work_dir: &Path, config: &Config) -> Option<PathBuf> {
    config.archive_dir.as_ref().map(|dir| {
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            work_dir.parent().unwrap_or(work_dir).join(path)
        }
    })
}

/// Initialize a new .bibsync directory at the given path
pub fn init_work_dir(path: &Path, group: &str, api_key: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = Config::new(group.to_string(), api_key.map(String::from))?;

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The database, lock file and config (which may hold a key) stay local.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = format!(
        "# Local mirror\n{DB_FILE_NAME}\n{DB_FILE_NAME}-*\n{LOCK_FILE_NAME}\n\n# May contain an API key\n{CONFIG_FILE_NAME}\n"
    );
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
