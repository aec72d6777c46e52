// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destination file operations.
//!
//! Each call opens, writes, and closes the file, so nothing holds a
//! descriptor between flushes and the file can be rotated underneath us.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while touching log files
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free archive name for {base} after {attempts} attempts")]
    ArchiveExhausted { base: String, attempts: u32 },
}

impl SinkError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> SinkError + '_ {
        move |source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(dir).map_err(SinkError::io(dir))
}

/// Append-only text file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Empty the file, creating it if needed.
    pub fn truncate(&self) -> Result<(), SinkError> {
        File::create(&self.path)
            .map(drop)
            .map_err(SinkError::io(&self.path))
    }

    /// Create the file empty if it does not exist. Returns true if created.
    pub fn ensure_exists(&self) -> Result<bool, SinkError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(SinkError::io(&self.path)(e)),
        }
    }

    /// Append `lines` in order with a single write and sync.
    ///
    /// Lines are written as-is; they carry their own terminators.
    /// Returns the number of bytes written.
    pub fn append(&self, lines: &[String]) -> Result<usize, SinkError> {
        if lines.is_empty() {
            return Ok(0);
        }
        let batch = lines.concat();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(SinkError::io(&self.path))?;
        file.write_all(batch.as_bytes())
            .map_err(SinkError::io(&self.path))?;
        file.sync_data().map_err(SinkError::io(&self.path))?;
        Ok(batch.len())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
