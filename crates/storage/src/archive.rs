// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dated archive copies of the destination file.
//!
//! On shutdown the live file is copied to `<year>-<month>-<day>-<n>.log`
//! next to it. Month and day are not zero-padded. `n` starts at 0 and the
//! first unused index wins, so an earlier run's archive is never replaced.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::sink::{LogFile, SinkError};

pub const ARCHIVE_EXTENSION: &str = "log";

/// Upper bound on indices probed for a single date
const MAX_ARCHIVES_PER_DAY: u32 = 10_000;

/// Archive name without index or extension, e.g. `2024-1-9`.
pub fn archive_base(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Path of archive number `index` for `date` inside `dir`.
pub fn archive_path(dir: &Path, date: NaiveDate, index: u32) -> PathBuf {
    dir.join(format!(
        "{}-{}.{}",
        archive_base(date),
        index,
        ARCHIVE_EXTENSION
    ))
}

/// Reserve the first free archive path for `date` in `dir`.
///
/// The returned path exists as an empty file owned by the caller. Reserving
/// with `create_new` keeps two concurrent rotations from picking the same name.
pub fn reserve_archive_path(dir: &Path, date: NaiveDate) -> Result<PathBuf, SinkError> {
    for index in 0..MAX_ARCHIVES_PER_DAY {
        let candidate = archive_path(dir, date, index);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(SinkError::io(&candidate)(e)),
        }
    }
    Err(SinkError::ArchiveExhausted {
        base: archive_base(date),
        attempts: MAX_ARCHIVES_PER_DAY,
    })
}

/// Copy `file` to a fresh dated archive beside it and return the archive path.
///
/// The live file is left in place.
pub fn rotate(file: &LogFile, date: NaiveDate) -> Result<PathBuf, SinkError> {
    let archive = reserve_archive_path(file.dir(), date)?;
    if let Err(e) = fs::copy(file.path(), &archive) {
        let _ = fs::remove_file(&archive);
        return Err(SinkError::io(file.path())(e));
    }
    debug!(
        file = %file.path().display(),
        archive = %archive.display(),
        "rotated log file"
    );
    Ok(archive)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
