// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for quill: line buffering, destination files, and rotation

pub mod archive;
mod queue;
mod registry;
mod sink;

pub use archive::{archive_base, archive_path, reserve_archive_path, rotate};
pub use queue::{QueueError, RecordQueue};
pub use registry::{Destination, QueueRegistry, Registration};
pub use sink::{ensure_dir, LogFile, SinkError};
