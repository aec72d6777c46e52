// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the logger crate.

use std::path::PathBuf;
use std::time::Duration;

use quill_core::Level;

// --- Duration helper (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// --- Config ---

/// TOML config file to start from (QUILL_CONFIG)
pub fn config_path() -> Option<PathBuf> {
    std::env::var("QUILL_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Destination directory override. An empty value disables persistence.
pub fn log_dir() -> Option<String> {
    std::env::var("QUILL_LOG_DIR").ok()
}

/// Destination filename override. An empty value disables persistence.
pub fn log_file() -> Option<String> {
    std::env::var("QUILL_LOG_FILE").ok()
}

/// Default level override; unrecognized names are ignored.
pub fn level() -> Option<Level> {
    std::env::var("QUILL_LEVEL").ok().and_then(|s| s.parse().ok())
}

/// Flush interval override
pub fn flush_interval() -> Option<Duration> {
    parse_duration_ms("QUILL_FLUSH_MS")
}

// --- Color ---

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

// --- quilld ---

/// Number of heartbeats before quilld exits on its own
pub fn heartbeat_count() -> Option<u64> {
    std::env::var("QUILL_HEARTBEAT_COUNT")
        .ok()
        .and_then(|s| s.parse().ok())
}

pub fn heartbeat_interval() -> Option<Duration> {
    parse_duration_ms("QUILL_HEARTBEAT_MS")
}
