// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for logger setup and shutdown

use std::io;
use std::path::PathBuf;

use quill_storage::SinkError;
use thiserror::Error;

/// Errors surfaced by construction and shutdown.
///
/// Logging calls themselves never fail; these only come out of
/// [`Logger::open`](crate::Logger::open), [`LogContext`](crate::LogContext)
/// setup, config loading, and [`Logger::cleanup`](crate::Logger::cleanup).
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: SinkError,
    },
    #[error("log file error: {0}")]
    Sink(#[from] SinkError),
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("cannot install signal handler: {0}")]
    Signal(#[source] io::Error),
    #[error("cannot start background runtime: {0}")]
    Runtime(#[source] io::Error),
}
