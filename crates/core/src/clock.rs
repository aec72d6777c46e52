// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction so timestamps and archive dates are testable.

use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// The real local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime};
    use parking_lot::Mutex;

    use super::Clock;

    /// Manually driven clock for tests. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        now: Arc<Mutex<NaiveDateTime>>,
    }

    impl FakeClock {
        /// A clock fixed at 2024-01-01 12:00:00.000.
        pub fn new() -> Self {
            Self::ymd(2024, 1, 1)
        }

        /// A clock fixed at noon on the given date.
        pub fn ymd(year: i32, month: u32, day: u32) -> Self {
            let at = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_milli_opt(12, 0, 0, 0))
                .unwrap_or_default();
            Self::at(at)
        }

        pub fn at(now: NaiveDateTime) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        pub fn set(&self, now: NaiveDateTime) {
            *self.now.lock() = now;
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            if let Ok(delta) = chrono::Duration::from_std(by) {
                *now += delta;
            }
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.lock()
        }
    }
}
