// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.tracesync/config.toml` and includes:
//! - `remote`: where submissions go (absent = local-only, everything stays queued)
//! - `sync`: engine behaviour (auto sync on enqueue, queue limit, agent interval)
//! - `notify`: user-facing notification grant and hooks

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::notify::NotifyConfig;
use crate::sync::{SubmitConfig, SyncPolicy};

const WORK_DIR_NAME: &str = ".tracesync";
const CONFIG_FILE_NAME: &str = "config.toml";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Name of the durable queue slot inside the work dir.
pub const QUEUE_SLOT_NAME: &str = "pending_ops";

/// Project configuration stored in `.tracesync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote store (optional - if absent, runs in local-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Remote store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL (`ws://...` or `wss://...`).
    pub url: String,
    /// Max time to wait for a connection in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Max time to wait for the answer to one submission in seconds (default: 10).
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            connect_timeout_secs: default_connect_timeout_secs(),
            submit_timeout_secs: default_submit_timeout_secs(),
        }
    }

    /// Returns an error message if the URL is not a WebSocket URL.
    pub fn validate_url(&self) -> Option<String> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            None
        } else {
            Some(Error::InvalidRemoteUrl(self.url.clone()).to_string())
        }
    }

    pub fn submit_config(&self) -> SubmitConfig {
        SubmitConfig {
            url: self.url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            submit_timeout: Duration::from_secs(self.submit_timeout_secs),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_submit_timeout_secs() -> u64 {
    10
}

/// Engine behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Start a sync right after an enqueue when online (default: true).
    #[serde(default = "default_sync_on_enqueue")]
    pub sync_on_enqueue: bool,
    /// Refuse new operations beyond this many pending. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pending: Option<usize>,
    /// Period of `tsync agent` cycles in seconds (default: 30).
    #[serde(default = "default_background_interval_secs")]
    pub background_interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            sync_on_enqueue: default_sync_on_enqueue(),
            max_pending: None,
            background_interval_secs: default_background_interval_secs(),
        }
    }
}

impl SyncSettings {
    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            sync_on_enqueue: self.sync_on_enqueue,
            max_pending: self.max_pending,
            ..SyncPolicy::default()
        }
    }

    pub fn background_interval(&self) -> Duration {
        Duration::from_secs(self.background_interval_secs)
    }
}

fn default_sync_on_enqueue() -> bool {
    true
}

fn default_background_interval_secs() -> u64 {
    30
}

impl Config {
    /// Creates a config pointing at the given remote.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteUrl`] if the URL is not ws:// or wss://.
    pub fn with_remote(url: &str) -> Result<Self> {
        let remote = RemoteConfig::new(url);
        if remote.validate_url().is_some() {
            return Err(Error::InvalidRemoteUrl(url.to_string()));
        }
        Ok(Config {
            remote: Some(remote),
            ..Config::default()
        })
    }

    /// Loads configuration from the given `.tracesync/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.as_ref().and_then(RemoteConfig::validate_url) {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }

    /// Saves configuration to the given `.tracesync/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        ts_core::jsonl::write_atomic(&config_path, &content)?;
        Ok(())
    }
}

/// Find the .tracesync directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .tracesync directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Initialize a new .tracesync directory at the given path
pub fn init_work_dir(path: &Path, remote: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = match remote {
        Some(url) => Config::with_remote(url)?,
        None => Config::default(),
    };

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The queue and its lock are per-device state and never belong in version control.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = format!(
        "# Per-device offline queue\n{QUEUE_SLOT_NAME}.jsonl\n{QUEUE_SLOT_NAME}.jsonl.tmp\n{QUEUE_SLOT_NAME}.lock\n"
    );
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
