// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use bibsync_core::Database;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(group: String, api_key: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let work_dir = init_work_dir(&target_path, &group, api_key.as_deref())?;

    // Create the database now so the cursor starts at 0 before the first sync
    let config = Config::load(&work_dir)?;
    let mut db = Database::open(&get_db_path(&work_dir, &config))?;
    db.get_version()?;

    println!("Initialized bibsync at {}", work_dir.display());
    println!("Group: {}", config.group);
    if config.api_key.is_none() {
        println!("API key: not stored, set BIBSYNC_API_KEY before syncing");
    }
    Ok(())
}
