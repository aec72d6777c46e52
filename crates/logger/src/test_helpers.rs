// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the logger crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_core::FakeClock;
use quill_storage::QueueRegistry;
use tempfile::TempDir;

use crate::config::LoggerConfig;
use crate::logger::{Logger, LoggerDeps};
use crate::streams::{LiveStreams, MemoryStream};

/// A logger with captured streams, a fake clock, and a temp destination.
pub(crate) struct TestLogger {
    pub logger: Logger,
    pub registry: QueueRegistry,
    pub clock: FakeClock,
    pub out: MemoryStream,
    pub err: MemoryStream,
    pub dir: TempDir,
}

impl TestLogger {
    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("latest.txt")
    }

    pub fn file_contents(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    /// Open another logger on the same registry with its own streams.
    pub fn worker(&self, config: &LoggerConfig) -> (Logger, MemoryStream) {
        let out = MemoryStream::new();
        let deps = LoggerDeps {
            clock: Arc::new(self.clock.clone()),
            streams: LiveStreams::new(out.clone(), out.clone()),
        };
        (
            Logger::open_with(config, &self.registry, deps).unwrap(),
            out,
        )
    }
}

/// Plain `[LEVEL] message` lines into `<tempdir>/latest.txt`.
pub(crate) fn config_in(dir: &Path) -> LoggerConfig {
    LoggerConfig::default()
        .with_template("[%level%] %message%")
        .with_color(false)
        .with_log_dir(dir)
}

pub(crate) fn setup() -> TestLogger {
    let dir = tempfile::tempdir().unwrap();
    setup_with(config_in(dir.path()), dir)
}

pub(crate) fn setup_with(config: LoggerConfig, dir: TempDir) -> TestLogger {
    let registry = QueueRegistry::new();
    let clock = FakeClock::new();
    let out = MemoryStream::new();
    let err = MemoryStream::new();
    let deps = LoggerDeps {
        clock: Arc::new(clock.clone()),
        streams: LiveStreams::new(out.clone(), err.clone()),
    };
    let logger = Logger::open_with(&config, &registry, deps).unwrap();
    TestLogger {
        logger,
        registry,
        clock,
        out,
        err,
        dir,
    }
}

/// Archive files (`*.log`) in `dir`, sorted by name.
pub(crate) fn archives(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".log"))
        .collect();
    names.sort();
    names
}
