// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live output streams: where formatted lines go immediately.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Which live stream a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Out,
    Err,
}

type BoxedWriter = Box<dyn Write + Send>;

struct StreamPair {
    out: BoxedWriter,
    err: BoxedWriter,
}

/// Standard and error output pair, closable once at shutdown.
///
/// Writes after [`close`](Self::close) are dropped.
pub struct LiveStreams {
    pair: Mutex<Option<StreamPair>>,
}

impl LiveStreams {
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            pair: Mutex::new(Some(StreamPair {
                out: Box::new(out),
                err: Box::new(err),
            })),
        }
    }

    /// The process's stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    /// Write `text` to one stream. Returns false if closed or the write failed.
    pub fn write(&self, kind: StreamKind, text: &str) -> bool {
        let mut pair = self.pair.lock();
        let Some(pair) = pair.as_mut() else {
            return false;
        };
        let writer = match kind {
            StreamKind::Out => &mut pair.out,
            StreamKind::Err => &mut pair.err,
        };
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .is_ok()
    }

    /// Flush and release both streams.
    pub fn close(&self) {
        if let Some(mut pair) = self.pair.lock().take() {
            let _ = pair.out.flush();
            let _ = pair.err.flush();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pair.lock().is_none()
    }
}

impl Default for LiveStreams {
    fn default() -> Self {
        Self::stdio()
    }
}

impl std::fmt::Debug for LiveStreams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStreams")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// In-memory stream; clones share the same buffer.
///
/// Handy for capturing live output in tests or embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}

impl Write for MemoryStream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "streams_tests.rs"]
mod tests;
