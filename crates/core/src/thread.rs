// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable per-thread labels for the `%thread%` placeholder.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_UNNAMED: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static LABEL: String = assign_label();
}

fn assign_label() -> String {
    match std::thread::current().name() {
        Some(name) => name.to_string(),
        None => format!("Thread-{}", NEXT_UNNAMED.fetch_add(1, Ordering::Relaxed)),
    }
}

/// Label of the calling thread.
///
/// `main` for the main thread, the thread name for named threads, and
/// `Thread-<n>` for unnamed ones. The label is fixed on first use.
pub fn label() -> String {
    LABEL.with(Clone::clone)
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
