// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logger configuration.
//!
//! Every option is optional. Sources, later wins: built-in defaults, a TOML
//! file (`QUILL_CONFIG`), then environment overrides.
//!
//! ```toml
//! level = "INFO"
//! template = "[%hh%:%mm%:%ss%] [%thread%/%level%]: %message%"
//! color = false
//! log_dir = "logs"
//! log_file = "latest.txt"
//! flush_interval_ms = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_core::{Level, Template};
use serde::Deserialize;

use crate::env;
use crate::error::LoggerError;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "latest.txt";
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Options captured when a logger is opened; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Level used by [`Logger::log`](crate::Logger::log)
    pub level: Level,
    /// Message template; `None` uses [`Template::default`]
    pub template: Option<String>,
    /// Color on the live streams. Persisted lines are always plain.
    pub color: bool,
    /// Destination directory, relative paths resolved against the cwd
    pub log_dir: Option<PathBuf>,
    /// Destination filename inside `log_dir`
    pub log_file: Option<String>,
    pub flush_interval_ms: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            template: None,
            color: true,
            log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            log_file: Some(DEFAULT_LOG_FILE.to_string()),
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }
}

impl LoggerConfig {
    /// Defaults with file persistence disabled.
    pub fn stream_only() -> Self {
        Self::default().without_persistence()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, LoggerError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoggerError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoggerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Config file named by `QUILL_CONFIG` (or defaults), then env overrides.
    pub fn from_env() -> Result<Self, LoggerError> {
        let base = match env::config_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env::log_dir() {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = env::log_file() {
            self.log_file = Some(file);
        }
        if let Some(level) = env::level() {
            self.level = level;
        }
        if let Some(interval) = env::flush_interval() {
            self.flush_interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        }
        if env::no_color() {
            self.color = false;
        }
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_log_file(mut self, file: impl Into<String>) -> Self {
        self.log_file = Some(file.into());
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn without_persistence(mut self) -> Self {
        self.log_dir = None;
        self.log_file = None;
        self
    }

    pub fn template(&self) -> Template {
        match &self.template {
            Some(source) => Template::new(source.clone()),
            None => Template::default(),
        }
    }

    /// Flush period, never shorter than 1ms.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(1))
    }

    /// Absolute path of the destination file, or `None` when persistence is
    /// disabled (directory or filename missing or empty).
    pub fn destination(&self) -> Option<PathBuf> {
        let dir = self.log_dir.as_deref().filter(|d| !d.as_os_str().is_empty())?;
        let file = self.log_file.as_deref().filter(|f| !f.is_empty())?;
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| dir.to_path_buf())
        };
        Some(dir.join(file))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
