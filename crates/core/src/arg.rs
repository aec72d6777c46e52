// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arguments accepted by the logging calls.
//!
//! Every argument is captured into one of three shapes at the call site:
//! verbatim text, a debug representation, or an error with its source chain.
//! Rendering never fails; a `Debug` impl that errors degrades to a placeholder.

use std::error::Error as StdError;
use std::fmt::{self, Write};

/// Placeholder for values whose `Debug` impl returned an error.
pub const UNFORMATTABLE: &str = "<unformattable value>";

/// A single argument to a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogArg {
    /// Inserted as-is.
    Text(String),
    /// Debug representation of an arbitrary value.
    Value(String),
    /// An error message followed by its `source()` chain.
    Error { message: String, causes: Vec<String> },
}

impl LogArg {
    /// Capture the debug representation of `value`.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        let mut out = String::new();
        match write!(out, "{:?}", value) {
            Ok(()) => LogArg::Value(out),
            Err(_) => LogArg::Value(UNFORMATTABLE.to_string()),
        }
    }

    /// Capture an error together with every error in its source chain.
    pub fn error(err: &(dyn StdError + 'static)) -> Self {
        let message = display_or_placeholder(err);
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(display_or_placeholder(cause));
            source = cause.source();
        }
        LogArg::Error { message, causes }
    }

    /// Render this argument to the text placed into `%message%`.
    pub fn render(&self) -> String {
        match self {
            LogArg::Text(text) | LogArg::Value(text) => text.clone(),
            LogArg::Error { message, causes } => {
                let mut out = message.clone();
                for cause in causes {
                    out.push_str("\n    caused by: ");
                    out.push_str(cause);
                }
                out
            }
        }
    }
}

fn display_or_placeholder<T: fmt::Display + ?Sized>(value: &T) -> String {
    let mut out = String::new();
    match write!(out, "{}", value) {
        Ok(()) => out,
        Err(_) => UNFORMATTABLE.to_string(),
    }
}

/// Join rendered arguments with single spaces.
pub fn join(args: &[LogArg]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&arg.render());
    }
    out
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        LogArg::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        LogArg::Text(text)
    }
}

impl From<&String> for LogArg {
    fn from(text: &String) -> Self {
        LogArg::Text(text.clone())
    }
}

impl From<std::io::Error> for LogArg {
    fn from(err: std::io::Error) -> Self {
        LogArg::error(&err)
    }
}

macro_rules! debug_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogArg {
            fn from(value: $ty) -> Self {
                LogArg::debug(&value)
            }
        })*
    };
}

debug_from!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
#[path = "arg_tests.rs"]
mod tests;
