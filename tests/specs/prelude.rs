//! Test helpers for behavioral specifications.
//!
//! A [`Harness`] owns a temp log directory, a fake clock, and in-memory
//! live streams, so specs can assert on exactly what reached each sink.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use quill::{
    Level, LiveStreams, LogArg, Logger, LoggerConfig, LoggerDeps, MemoryStream, ShutdownReport,
};
pub use quill_core::FakeClock;
pub use quill_storage::QueueRegistry;

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub registry: QueueRegistry,
    pub clock: FakeClock,
}

pub fn harness() -> Harness {
    Harness {
        dir: tempfile::tempdir().unwrap(),
        registry: QueueRegistry::new(),
        clock: FakeClock::new(),
    }
}

/// A logger plus the streams it writes to.
pub struct Opened {
    pub logger: Logger,
    pub out: MemoryStream,
    pub err: MemoryStream,
}

impl Harness {
    /// `[LEVEL] message` lines, color off, persisted to `latest.txt`.
    pub fn config(&self) -> LoggerConfig {
        LoggerConfig::default()
            .with_template("[%level%] %message%")
            .with_color(false)
            .with_log_dir(self.dir.path())
    }

    pub fn open(&self, config: &LoggerConfig) -> Opened {
        let out = MemoryStream::new();
        let err = MemoryStream::new();
        let deps = LoggerDeps {
            clock: Arc::new(self.clock.clone()),
            streams: LiveStreams::new(out.clone(), err.clone()),
        };
        let logger = Logger::open_with(config, &self.registry, deps).unwrap();
        Opened { logger, out, err }
    }

    pub fn logger(&self) -> Opened {
        self.open(&self.config())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Contents of the destination file (empty if missing).
    pub fn file(&self) -> String {
        read(&self.path("latest.txt"))
    }

    pub fn archives(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".log"))
            .collect();
        names.sort();
        names
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Poll `cond` until it holds or [`SPEC_WAIT_MAX_MS`] elapses.
pub async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS)).await;
    }
    cond()
}
