//! Pool configuration: defaults, TOML files and environment overrides.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_WORKERS: &str = "THREAD_LABS_WORKERS";
pub const ENV_QUEUE_CAPACITY: &str = "THREAD_LABS_QUEUE_CAPACITY";

const MAX_WORKERS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of worker threads, at least one.
    pub workers: usize,
    /// `None` means the queue never refuses work.
    pub queue_capacity: Option<usize>,
    pub thread_name_prefix: String,
    /// Used by callers that shut down without an explicit bound.
    pub shutdown_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            queue_capacity: None,
            thread_name_prefix: "lab-worker".to_string(),
            shutdown_timeout_ms: 10_000,
        }
    }
}

impl PoolConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PoolConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `THREAD_LABS_WORKERS` / `THREAD_LABS_QUEUE_CAPACITY` on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_WORKERS) {
            self.workers = parse_count(ENV_WORKERS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            self.queue_capacity = Some(parse_count(ENV_QUEUE_CAPACITY, &raw)?);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::invalid("workers", "a pool needs at least one worker"));
        }
        if self.workers > MAX_WORKERS {
            return Err(ConfigError::invalid(
                "workers",
                format!("{} exceeds the limit of {MAX_WORKERS}", self.workers),
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::invalid(
                "queue_capacity",
                "a bounded queue must hold at least one task",
            ));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("thread_name_prefix", "must not be empty"));
        }
        Ok(())
    }
}

fn parse_count(field: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|err| ConfigError::invalid(field, format!("'{raw}' is not a count: {err}")))
}
