// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ANSI color helpers: painting text and stripping markup before persistence.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

pub const GRAY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
pub const RESET: &str = "\x1b[0m";

// CSI sequences (colors, cursor movement) and OSC sequences (hyperlinks, titles).
#[allow(clippy::expect_used)]
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
        .expect("constant regex pattern is valid")
});

/// Wrap `text` in the given color code and a trailing reset.
pub fn paint(code: &str, text: &str) -> String {
    format!("{code}{text}{RESET}")
}

/// Remove all ANSI escape sequences from `text`.
///
/// Borrows when there is nothing to strip.
pub fn strip(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    ANSI_RE.replace_all(text, "")
}

#[cfg(test)]
#[path = "ansi_tests.rs"]
mod tests;
