// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of persistence destinations, keyed by file path.
//!
//! Loggers writing to the same path share one [`Destination`]: one queue and
//! one flush gate. Whoever registers a path first is its initiator and is the
//! only one allowed to truncate the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::queue::RecordQueue;
use crate::sink::LogFile;

/// A persisted log file with its pending lines.
#[derive(Debug)]
pub struct Destination {
    file: LogFile,
    queue: RecordQueue,
    // Serializes appends to `file` between flush ticks and shutdown
    gate: Mutex<()>,
}

impl Destination {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: LogFile::new(path),
            queue: RecordQueue::new(),
            gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file(&self) -> &LogFile {
        &self.file
    }

    pub fn queue(&self) -> &RecordQueue {
        &self.queue
    }

    /// Take the append gate if no other flush holds it.
    pub fn try_gate(&self) -> Option<MutexGuard<'_, ()>> {
        self.gate.try_lock()
    }

    /// Take the append gate, waiting at most `timeout` for an in-flight flush.
    pub fn try_gate_for(&self, timeout: Duration) -> Option<MutexGuard<'_, ()>> {
        self.gate.try_lock_for(timeout)
    }

    /// Take the append gate, waiting for an in-flight flush to finish.
    pub fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock()
    }
}

/// Outcome of [`QueueRegistry::register`].
#[derive(Debug, Clone)]
pub enum Registration {
    /// The path was new; the caller initiated it.
    Created(Arc<Destination>),
    /// Another logger already registered the path.
    Joined(Arc<Destination>),
}

impl Registration {
    pub fn destination(&self) -> &Arc<Destination> {
        match self {
            Registration::Created(dest) | Registration::Joined(dest) => dest,
        }
    }

    pub fn into_destination(self) -> Arc<Destination> {
        match self {
            Registration::Created(dest) | Registration::Joined(dest) => dest,
        }
    }

    pub fn is_initiator(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

/// Shared map from destination path to [`Destination`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct QueueRegistry {
    entries: Arc<Mutex<HashMap<PathBuf, Arc<Destination>>>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path`, or join the destination already registered for it.
    pub fn register(&self, path: &Path) -> Registration {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(path) {
            return Registration::Joined(Arc::clone(existing));
        }
        let dest = Arc::new(Destination::new(path.to_path_buf()));
        entries.insert(path.to_path_buf(), Arc::clone(&dest));
        Registration::Created(dest)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Destination>> {
        self.entries.lock().get(path).cloned()
    }

    /// Detach `dest` from the registry and close its queue.
    ///
    /// The entry is only removed if it still maps to `dest`. Returns whether
    /// it was removed, plus any lines still queued so the caller can persist
    /// them.
    pub fn detach(&self, dest: &Arc<Destination>) -> (bool, Vec<String>) {
        let removed = {
            let mut entries = self.entries.lock();
            let is_current = entries
                .get(dest.path())
                .is_some_and(|current| Arc::ptr_eq(current, dest));
            if is_current {
                entries.remove(dest.path());
            }
            is_current
        };
        (removed, dest.queue().close())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
