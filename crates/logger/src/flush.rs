// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic flushing of queued lines to the destination file.
//!
//! A flush takes the destination's gate with `try_lock`. If another flush (or
//! shutdown) holds it, the flush is skipped; the lines stay queued for the
//! next tick, so a skip never loses or duplicates anything. A failed append
//! puts the batch back at the front of the queue.

use std::time::Duration;

use quill_storage::Destination;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{trace, warn};

use crate::logger::Logger;

/// Result of a single flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The logger has no destination file
    Disabled,
    /// Another flush for the destination was in flight
    Skipped,
    /// Nothing was queued
    Empty,
    Written { lines: usize, bytes: usize },
    /// The append failed; the batch was re-queued
    Failed,
}

/// Drain `dest`'s queue into its file, single-flight per destination.
pub fn flush_destination(dest: &Destination) -> FlushOutcome {
    let Some(_gate) = dest.try_gate() else {
        return FlushOutcome::Skipped;
    };
    write_queued(dest)
}

/// Like [`flush_destination`], but waits up to `wait` for an in-flight flush.
pub(crate) fn flush_destination_within(dest: &Destination, wait: Duration) -> FlushOutcome {
    let Some(_gate) = dest.try_gate_for(wait) else {
        return FlushOutcome::Skipped;
    };
    write_queued(dest)
}

// Caller holds the destination's gate
fn write_queued(dest: &Destination) -> FlushOutcome {
    let batch = dest.queue().drain();
    if batch.is_empty() {
        return FlushOutcome::Empty;
    }

    match dest.file().append(&batch) {
        Ok(bytes) => FlushOutcome::Written {
            lines: batch.len(),
            bytes,
        },
        Err(e) => {
            warn!(
                path = %dest.path().display(),
                lines = batch.len(),
                error = %e,
                "failed to flush log queue, will retry"
            );
            dest.queue().requeue_front(batch);
            FlushOutcome::Failed
        }
    }
}

/// Background task flushing a logger on its configured interval.
///
/// Stops on its own once the logger has been cleaned up; dropping the
/// scheduler aborts it.
#[derive(Debug)]
pub struct FlushScheduler {
    logger: Logger,
    handle: JoinHandle<()>,
}

impl FlushScheduler {
    /// Spawn the flush task on the current tokio runtime.
    ///
    /// Returns `None` if the logger has no destination file.
    pub fn spawn(logger: Logger) -> Option<Self> {
        Self::spawn_on(logger, &tokio::runtime::Handle::current())
    }

    /// Spawn the flush task on `runtime`.
    pub fn spawn_on(logger: Logger, runtime: &tokio::runtime::Handle) -> Option<Self> {
        logger.destination()?;
        let period = logger.flush_interval();
        let handle = runtime.spawn(run(logger.clone(), period));
        Some(Self { logger, handle })
    }

    /// Run one flush on the calling thread, outside the tick schedule.
    pub fn flush_now(&self) -> FlushOutcome {
        self.logger.flush()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(logger: Logger, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        if logger.is_shut_down() {
            break;
        }

        let flusher = logger.clone();
        match tokio::task::spawn_blocking(move || flusher.flush()).await {
            Ok(outcome) => trace!(?outcome, "flush tick"),
            Err(e) => warn!(error = %e, "flush task failed"),
        }
    }
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
