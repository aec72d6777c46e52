// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! quill: a buffered, durable, process-wide logger
//!
//! Records go to stdout/stderr immediately and to a destination file in
//! batches. On shutdown the file is flushed and copied to a dated archive.

mod config;
mod context;
pub mod env;
mod error;
mod flush;
mod layer;
mod logger;
mod shutdown;
mod streams;

#[cfg(test)]
mod test_helpers;

pub use config::{LoggerConfig, DEFAULT_FLUSH_INTERVAL_MS, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
pub use context::{global, install_global, teardown_global, ContextBuilder, LogContext};
pub use error::LoggerError;
pub use flush::{flush_destination, FlushOutcome, FlushScheduler};
pub use layer::LoggerLayer;
pub use logger::{Logger, LoggerDeps};
pub use quill_core::{Level, LogArg, Template};
pub use shutdown::{install_panic_hook, spawn_signal_listener, ShutdownReport};
pub use streams::{LiveStreams, MemoryStream, StreamKind};
