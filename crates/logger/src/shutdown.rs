// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shutdown: final flush, rotation, and stream closure.
//!
//! Every trigger (explicit teardown, drop, termination signals, fatal panics)
//! funnels into [`run`], which executes at most once per logger.
//!
//! Order matters:
//! 1. log the reason at CRITICAL so it is part of the final flush
//! 2. drain the queue into the file, blocking on any in-flight flush
//! 3. detach the destination so late pushes are rejected
//! 4. copy the file to a fresh dated archive
//! 5. close the live streams, even if 2-4 failed

use std::panic::PanicHookInfo;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Once, Weak};
use std::time::Duration;

use parking_lot::{const_mutex, Mutex};
use quill_core::{Level, LogArg};
use quill_storage::{archive, ensure_dir};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::LoggerError;
use crate::flush;
use crate::logger::{Logger, LoggerInner, Persistence};

/// What a shutdown did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShutdownReport {
    /// Shutdown had already run; nothing was done
    pub already_shut_down: bool,
    /// Lines appended by the final flush
    pub flushed: usize,
    /// Archive copy written, if any
    pub archive: Option<PathBuf>,
}

impl ShutdownReport {
    fn already() -> Self {
        Self {
            already_shut_down: true,
            ..Self::default()
        }
    }
}

pub(crate) fn run(logger: &Logger, reason: Option<LogArg>) -> Result<ShutdownReport, LoggerError> {
    if logger.inner.shut_down.swap(true, Ordering::SeqCst) {
        return Ok(ShutdownReport::already());
    }

    if let Some(reason) = reason {
        logger.record(Level::Critical, [reason]);
    }

    let result = match &logger.inner.persistence {
        Some(persistence) => persist_and_rotate(&logger.inner, persistence),
        None => Ok(ShutdownReport::default()),
    };

    logger.inner.streams.close();
    result
}

fn persist_and_rotate(
    inner: &LoggerInner,
    persistence: &Persistence,
) -> Result<ShutdownReport, LoggerError> {
    let dest = &persistence.destination;
    let file = dest.file();

    // A setup failure only skips the append; the queue is still detached
    let setup = ensure_dir(file.dir())
        .map_err(|source| LoggerError::CreateDir {
            path: file.dir().to_path_buf(),
            source,
        })
        .and_then(|()| {
            if persistence.initiator {
                file.ensure_exists()?;
            }
            Ok(())
        });

    let (detached, flushed, appended) = {
        let _gate = dest.gate();
        let mut batch = dest.queue().drain();
        let (detached, leftovers) = inner.registry.detach(dest);
        batch.extend(leftovers);
        let appended = setup.and_then(|()| Ok(file.append(&batch)?));
        (detached, batch.len(), appended)
    };
    appended?;

    // Another logger sharing this destination already rotated it
    if !detached {
        return Ok(ShutdownReport {
            flushed,
            ..ShutdownReport::default()
        });
    }

    let archive = archive::rotate(file, inner.clock.now().date())?;
    Ok(ShutdownReport {
        already_shut_down: false,
        flushed,
        archive: Some(archive),
    })
}

/// Run cleanup from a background trigger, where nobody can receive the error.
pub(crate) fn cleanup_logged(group: &LoggerGroup, reason: Option<LogArg>) {
    match group.cleanup(reason) {
        Ok(report) if report.already_shut_down => debug!("loggers already shut down"),
        Ok(report) => info!(
            flushed = report.flushed,
            archive = ?report.archive,
            "logger shut down"
        ),
        Err(e) => warn!(error = %e, "logger shutdown failed"),
    }
}

/// Loggers that shut down together: a context's primary logger, then every
/// worker opened through it.
#[derive(Debug, Clone)]
pub(crate) struct LoggerGroup(Arc<Mutex<Vec<Logger>>>);

impl LoggerGroup {
    pub(crate) fn new(primary: Logger) -> Self {
        Self(Arc::new(Mutex::new(vec![primary])))
    }

    pub(crate) fn add(&self, logger: Logger) {
        self.0.lock().push(logger);
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Clean up every member and return the primary's report.
    ///
    /// Only the primary logs `reason`. Workers sharing its destination find
    /// it already detached and do not rotate again.
    pub(crate) fn cleanup(&self, reason: Option<LogArg>) -> Result<ShutdownReport, LoggerError> {
        let members = self.0.lock().clone();
        let mut members = members.into_iter();
        let Some(primary) = members.next() else {
            return Ok(ShutdownReport::default());
        };
        let report = primary.cleanup(reason);
        for worker in members {
            if let Err(e) = worker.cleanup(None) {
                warn!(
                    destination = ?worker.destination(),
                    error = %e,
                    "worker logger shutdown failed"
                );
            }
        }
        report
    }
}

/// Spawn a task that runs cleanup on the first termination signal.
///
/// Listens for SIGINT, SIGTERM, SIGUSR1 and SIGUSR2 (ctrl-c elsewhere). The
/// signal name is logged as the shutdown reason. Afterwards `requested` is
/// set, and the process exits with status 0 if `exit` is true.
pub fn spawn_signal_listener(
    logger: Logger,
    requested: Arc<watch::Sender<bool>>,
    exit: bool,
) -> Result<JoinHandle<()>, LoggerError> {
    spawn_group_signal_listener(LoggerGroup::new(logger), requested, exit)
}

pub(crate) fn spawn_group_signal_listener(
    group: LoggerGroup,
    requested: Arc<watch::Sender<bool>>,
    exit: bool,
) -> Result<JoinHandle<()>, LoggerError> {
    let signals = TerminationSignals::install().map_err(LoggerError::Signal)?;
    Ok(tokio::spawn(async move {
        let name = signals.recv().await;
        info!(signal = name, "received termination signal");
        cleanup_logged(&group, Some(LogArg::from(format!("received {name}"))));
        requested.send_replace(true);
        if exit {
            std::process::exit(0);
        }
    }))
}

#[cfg(unix)]
struct TerminationSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    user1: tokio::signal::unix::Signal,
    user2: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            user1: signal(SignalKind::user_defined1())?,
            user2: signal(SignalKind::user_defined2())?,
        })
    }

    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.user1.recv() => "SIGUSR1",
            _ = self.user2.recv() => "SIGUSR2",
        }
    }
}

#[cfg(not(unix))]
struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    }
}

/// How long the panic hook waits for an in-flight flush before giving up.
const PANIC_FLUSH_WAIT: Duration = Duration::from_millis(250);

static PANIC_HOOK: Once = Once::new();
static PANIC_WATCHED: Mutex<Vec<Weak<LoggerInner>>> = const_mutex(Vec::new());

/// Persist `logger`'s queue when a thread panics.
///
/// The process-wide hook is installed once and defers to the previous hook.
/// Loggers are held weakly, so registering does not keep them alive.
///
/// A panic that may still be recovered (caught with `catch_unwind`, or a
/// panicking tokio task) is logged at ERROR and flushed; the logger keeps
/// working. A fatal panic (on the main thread, or under `panic = "abort"`)
/// runs the full cleanup with the panic as the reason.
pub fn install_panic_hook(logger: &Logger) {
    {
        let mut watched = PANIC_WATCHED.lock();
        watched.retain(|w| w.strong_count() > 0);
        let target = Arc::as_ptr(&logger.inner);
        if !watched.iter().any(|w| std::ptr::eq(w.as_ptr(), target)) {
            watched.push(Arc::downgrade(&logger.inner));
        }
    }

    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let reason = panic_reason(info);
            let fatal = panic_is_fatal(std::thread::current().name());
            for logger in watched_loggers() {
                on_panic(&logger, &reason, fatal);
            }
            previous(info);
        }));
    });
}

fn watched_loggers() -> Vec<Logger> {
    // The panic may have happened while registering
    let Some(watched) = PANIC_WATCHED.try_lock() else {
        return Vec::new();
    };
    watched
        .iter()
        .filter_map(Weak::upgrade)
        .map(|inner| Logger { inner })
        .collect()
}

fn on_panic(logger: &Logger, reason: &str, fatal: bool) {
    if fatal {
        cleanup_logged(&LoggerGroup::new(logger.clone()), Some(LogArg::from(reason)));
        return;
    }
    logger.emit(Level::Error, [LogArg::from(reason)]);
    if let Some(persistence) = &logger.inner.persistence {
        let outcome = flush::flush_destination_within(&persistence.destination, PANIC_FLUSH_WAIT);
        debug!(?outcome, "flushed on panic");
    }
}

pub(crate) fn panic_is_fatal(thread: Option<&str>) -> bool {
    cfg!(panic = "abort") || thread == Some("main")
}

fn panic_reason(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    match info.location() {
        Some(location) => format!("panic at {location}: {message}"),
        None => format!("panic: {message}"),
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
