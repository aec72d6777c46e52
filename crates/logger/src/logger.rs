// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The logger: formats records, writes them to the live streams, and queues
//! a plain-text copy for the destination file.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use quill_core::{ansi, arg, Clock, Level, LogArg, Stamp, SystemClock, Template};
use quill_storage::{ensure_dir, Destination, LogFile, QueueRegistry};
use tracing::debug;

use crate::config::LoggerConfig;
use crate::error::LoggerError;
use crate::flush::{self, FlushOutcome};
use crate::shutdown::{self, ShutdownReport};
use crate::streams::{LiveStreams, StreamKind};

/// Collaborators a logger is opened with.
pub struct LoggerDeps {
    pub clock: Arc<dyn Clock>,
    pub streams: LiveStreams,
}

impl Default for LoggerDeps {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            streams: LiveStreams::stdio(),
        }
    }
}

/// File persistence state of one logger.
#[derive(Debug)]
pub(crate) struct Persistence {
    pub(crate) destination: Arc<Destination>,
    /// Whether this logger registered the destination (and truncated it)
    pub(crate) initiator: bool,
}

pub(crate) struct LoggerInner {
    pub(crate) level: Level,
    pub(crate) template: Template,
    pub(crate) color: bool,
    pub(crate) flush_interval: Duration,
    pub(crate) persistence: Option<Persistence>,
    pub(crate) registry: QueueRegistry,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) streams: LiveStreams,
    pub(crate) shut_down: AtomicBool,
}

/// Handle to a logger. Clones share the same instance.
///
/// Logging calls never fail and never touch the destination file: they
/// write to the live stream on the calling thread and push onto the
/// destination's queue. The file is written by [`flush`](Self::flush)
/// (normally driven by a [`FlushScheduler`](crate::FlushScheduler)) and by
/// [`cleanup`](Self::cleanup).
#[derive(Clone)]
pub struct Logger {
    pub(crate) inner: Arc<LoggerInner>,
}

impl Logger {
    /// Open a logger writing to stdout/stderr with the system clock.
    pub fn open(config: &LoggerConfig, registry: &QueueRegistry) -> Result<Self, LoggerError> {
        Self::open_with(config, registry, LoggerDeps::default())
    }

    /// Open a logger with explicit collaborators.
    ///
    /// With persistence configured, the destination directory is created and
    /// the destination registered. Only the first logger to register a path
    /// truncates the file; later ones append to what is there.
    pub fn open_with(
        config: &LoggerConfig,
        registry: &QueueRegistry,
        deps: LoggerDeps,
    ) -> Result<Self, LoggerError> {
        let persistence = match config.destination() {
            Some(path) => Some(open_destination(&path, registry)?),
            None => None,
        };

        Ok(Self::from_parts(config, persistence, registry.clone(), deps))
    }

    /// Open a logger that only writes to the live streams, whatever the
    /// config says about persistence.
    pub fn stream_only(config: &LoggerConfig, deps: LoggerDeps) -> Self {
        Self::from_parts(config, None, QueueRegistry::new(), deps)
    }

    fn from_parts(
        config: &LoggerConfig,
        persistence: Option<Persistence>,
        registry: QueueRegistry,
        deps: LoggerDeps,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                level: config.level,
                template: config.template(),
                color: config.color,
                flush_interval: config.flush_interval(),
                persistence,
                registry,
                clock: deps.clock,
                streams: deps.streams,
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Format and write one record. Does nothing once the logger is shut down.
    pub fn emit<I>(&self, level: Level, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        if self.is_shut_down() {
            return;
        }
        self.record(level, args);
    }

    /// [`emit`](Self::emit) without the shutdown check, for the final
    /// shutdown reason.
    pub(crate) fn record<I>(&self, level: Level, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        let args: Vec<LogArg> = args.into_iter().map(Into::into).collect();
        let stamp = Stamp::capture(self.inner.clock.as_ref());
        let line = self
            .inner
            .template
            .render(&stamp, level, &args, self.inner.color);

        let kind = if level.is_error_class() {
            StreamKind::Err
        } else {
            StreamKind::Out
        };
        self.inner.streams.write(kind, &line);
        self.enqueue(&line);
    }

    /// Write the joined arguments with no template framing.
    pub fn raw<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        if self.is_shut_down() {
            return;
        }
        let args: Vec<LogArg> = args.into_iter().map(Into::into).collect();
        let text = arg::join(&args);
        self.inner.streams.write(StreamKind::Out, &text);
        self.enqueue(&text);
    }

    /// Emit at the configured default level.
    pub fn log<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(self.inner.level, args);
    }

    pub fn debug<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(Level::Debug, args);
    }

    pub fn info<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(Level::Info, args);
    }

    pub fn warn<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(Level::Warning, args);
    }

    pub fn error<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(Level::Error, args);
    }

    pub fn critical<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<LogArg>,
    {
        self.emit(Level::Critical, args);
    }

    /// Append queued lines to the destination file, unless a flush for the
    /// same destination is already running.
    pub fn flush(&self) -> FlushOutcome {
        match &self.inner.persistence {
            Some(persistence) => flush::flush_destination(&persistence.destination),
            None => FlushOutcome::Disabled,
        }
    }

    /// Flush synchronously, rotate the destination file, and close the live
    /// streams. Runs once; later calls report that shutdown already happened.
    ///
    /// A `reason` is logged at CRITICAL before the final flush.
    pub fn cleanup(&self, reason: Option<LogArg>) -> Result<ShutdownReport, LoggerError> {
        shutdown::run(self, reason)
    }

    pub fn level(&self) -> Level {
        self.inner.level
    }

    pub fn color(&self) -> bool {
        self.inner.color
    }

    pub fn flush_interval(&self) -> Duration {
        self.inner.flush_interval
    }

    /// Destination file, if persistence is configured.
    pub fn destination(&self) -> Option<&Path> {
        self.inner
            .persistence
            .as_ref()
            .map(|p| p.destination.path())
    }

    /// Number of lines waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.inner
            .persistence
            .as_ref()
            .map_or(0, |p| p.destination.queue().len())
    }

    /// True if this logger registered its destination first.
    pub(crate) fn initiates_destination(&self) -> bool {
        self.inner
            .persistence
            .as_ref()
            .is_some_and(|p| p.initiator)
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    fn enqueue(&self, text: &str) {
        let Some(persistence) = &self.inner.persistence else {
            return;
        };
        let plain = ansi::strip(text).into_owned();
        if let Err(e) = persistence.destination.queue().push(plain) {
            debug!(
                path = %persistence.destination.path().display(),
                error = %e,
                "dropping line for detached destination"
            );
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("color", &self.inner.color)
            .field("destination", &self.destination())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn open_destination(path: &Path, registry: &QueueRegistry) -> Result<Persistence, LoggerError> {
    let file = LogFile::new(path.to_path_buf());
    ensure_dir(file.dir()).map_err(|source| LoggerError::CreateDir {
        path: file.dir().to_path_buf(),
        source,
    })?;

    let registration = registry.register(path);
    let initiator = registration.is_initiator();
    let destination = registration.into_destination();
    if initiator {
        if let Err(e) = destination.file().truncate() {
            registry.detach(&destination);
            return Err(e.into());
        }
    }

    debug!(path = %path.display(), initiator, "opened log destination");
    Ok(Persistence {
        destination,
        initiator,
    })
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
