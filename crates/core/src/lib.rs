// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! quill-core: record formatting for the quill logger

pub mod ansi;
pub mod arg;
pub mod clock;
pub mod level;
pub mod template;
pub mod thread;

pub use arg::LogArg;
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock};
pub use level::{Level, ParseLevelError};
pub use template::{Stamp, Template};
