// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message templates and line rendering.
//!
//! A template is plain text with placeholders:
//!
//! | Placeholder | Substitution                      |
//! |-------------|-----------------------------------|
//! | `%hh%`      | hour, 2 digits                    |
//! | `%mm%`      | minute, 2 digits                  |
//! | `%ss%`      | second, 2 digits                  |
//! | `%ms%`      | millisecond, 3 digits             |
//! | `%thread%`  | label of the logging thread       |
//! | `%level%`   | level name, colored if enabled    |
//! | `%message%` | arguments joined by single spaces |
//!
//! Each placeholder is replaced at its first occurrence only. Unknown
//! placeholders are left untouched.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::ansi::{self, GRAY, RESET};
use crate::arg::{self, LogArg};
use crate::clock::Clock;
use crate::level::Level;
use crate::thread;

/// Time and thread captured when a record is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub thread: String,
}

impl Stamp {
    /// Capture the current time from `clock` and the calling thread's label.
    pub fn capture(clock: &dyn Clock) -> Self {
        Self::from_time(clock.now(), thread::label())
    }

    pub fn from_time(time: NaiveDateTime, thread: impl Into<String>) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            // Leap seconds report >= 1000 ms
            millisecond: (time.nanosecond() / 1_000_000).min(999),
            thread: thread.into(),
        }
    }
}

/// A message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render one line. The result always ends with `\n`.
    ///
    /// With `color` off, every ANSI sequence is stripped from the result,
    /// including any embedded in the template itself.
    pub fn render(&self, stamp: &Stamp, level: Level, args: &[LogArg], color: bool) -> String {
        let mut line = self.source.clone();
        replace_once(&mut line, "%hh%", &format!("{:02}", stamp.hour));
        replace_once(&mut line, "%mm%", &format!("{:02}", stamp.minute));
        replace_once(&mut line, "%ss%", &format!("{:02}", stamp.second));
        replace_once(&mut line, "%ms%", &format!("{:03}", stamp.millisecond));
        replace_once(&mut line, "%thread%", &stamp.thread);
        replace_once(&mut line, "%level%", &level.label(color));
        replace_once(&mut line, "%message%", &arg::join(args));

        if !line.ends_with('\n') {
            line.push('\n');
        }
        if color {
            line
        } else {
            ansi::strip(&line).into_owned()
        }
    }
}

impl Default for Template {
    /// `[hh:mm:ss] [thread/LEVEL]: message`, with the time in gray.
    fn default() -> Self {
        Self::new(format!(
            "[{GRAY}%hh%:%mm%:%ss%{RESET}] [%thread%/%level%]: %message%\n"
        ))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

fn replace_once(line: &mut String, placeholder: &str, value: &str) {
    if let Some(at) = line.find(placeholder) {
        line.replace_range(at..at + placeholder.len(), value);
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
