// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Supervision of long-running background work.
//!
//! A [`BackgroundTask`] describes one unit of work (the library
//! subscription): whether it may run in a development environment and
//! whether it is restarted after it ends.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::env;
use crate::error::{Error, Result};

/// Deployment environment, selected by `BIBSYNC_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Read `BIBSYNC_ENV`; unset or empty means production.
    pub fn from_env() -> Result<Self> {
        match env::environment() {
            Some(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Environment::Production),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(Error::InvalidEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a supervised task ended.
#[derive(Debug)]
pub enum TaskOutcome<E> {
    /// Not started because of the environment.
    Skipped,
    /// Stopped by the cancellation token.
    Cancelled,
    /// Returned on its own and was not restarted.
    Finished(std::result::Result<(), E>),
}

/// A named background task and its run policy.
#[derive(Debug, Clone)]
pub struct BackgroundTask {
    pub name: String,
    /// Run even in the development environment.
    pub run_in_dev: bool,
    /// Restart after this delay when the task ends; `None` runs it once.
    pub restart: Option<Duration>,
}

impl BackgroundTask {
    pub fn new(name: impl Into<String>) -> Self {
        BackgroundTask {
            name: name.into(),
            run_in_dev: false,
            restart: None,
        }
    }

    pub fn should_run(&self, environment: Environment) -> bool {
        environment != Environment::Development || self.run_in_dev
    }

    /// Run the task built by `start` under this policy until it finishes
    /// for good or `cancel` fires.
    pub async fn run<F, Fut, E>(
        &self,
        environment: Environment,
        cancel: &CancellationToken,
        mut start: F,
    ) -> TaskOutcome<E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: fmt::Display,
    {
        if !self.should_run(environment) {
            info!(task = %self.name, %environment, "skipping background task");
            return TaskOutcome::Skipped;
        }

        loop {
            info!(task = %self.name, "starting background task");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return TaskOutcome::Cancelled,
                result = start() => result,
            };
            if cancel.is_cancelled() {
                return TaskOutcome::Cancelled;
            }

            match &result {
                Ok(()) => info!(task = %self.name, "background task finished"),
                Err(e) => error!(task = %self.name, error = %e, "background task failed"),
            }

            let Some(delay) = self.restart else {
                return TaskOutcome::Finished(result);
            };
            info!(task = %self.name, delay_secs = delay.as_secs(), "restarting background task");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return TaskOutcome::Cancelled,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
