// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory buffer of formatted lines awaiting persistence.
//!
//! Producers push from any thread; the flusher drains the whole buffer in a
//! single swap. Both happen under one short critical section, so a push that
//! races a drain lands either in the drained batch or in the emptied buffer,
//! never in neither.

use std::mem;

use parking_lot::Mutex;
use thiserror::Error;

/// Errors that can occur when pushing to a queue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("record queue is closed")]
    Closed,
}

#[derive(Debug, Default)]
struct QueueState {
    lines: Vec<String>,
    closed: bool,
}

/// Append-only line buffer with an atomic drain.
#[derive(Debug, Default)]
pub struct RecordQueue {
    state: Mutex<QueueState>,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Fails only after [`close`](Self::close).
    pub fn push(&self, line: impl Into<String>) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed);
        }
        state.lines.push(line.into());
        Ok(())
    }

    /// Remove and return every queued line, oldest first.
    pub fn drain(&self) -> Vec<String> {
        mem::take(&mut self.state.lock().lines)
    }

    /// Put back a drained batch that could not be written.
    ///
    /// The batch goes ahead of anything pushed since it was drained.
    pub fn requeue_front(&self, mut batch: Vec<String>) {
        if batch.is_empty() {
            return;
        }
        let mut state = self.state.lock();
        batch.append(&mut state.lines);
        state.lines = batch;
    }

    /// Reject all further pushes, returning whatever was still queued.
    pub fn close(&self) -> Vec<String> {
        let mut state = self.state.lock();
        state.closed = true;
        mem::take(&mut state.lines)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().lines.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
