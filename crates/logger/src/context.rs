// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level logging context: startup, background tasks, and teardown.

use std::sync::{Arc, OnceLock};

use parking_lot::{const_mutex, Mutex};
use quill_core::LogArg;
use quill_storage::QueueRegistry;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::LoggerConfig;
use crate::error::LoggerError;
use crate::flush::{FlushOutcome, FlushScheduler};
use crate::logger::{Logger, LoggerDeps};
use crate::shutdown::{self, LoggerGroup, ShutdownReport};

/// Owns the queue registry and the primary logger, plus the tasks that flush
/// it and shut it down on signals.
///
/// Background tasks run on the caller's tokio runtime. Outside one, the
/// context starts a single-worker runtime of its own.
///
/// Dropping a context that was never torn down runs cleanup.
pub struct LogContext {
    registry: QueueRegistry,
    logger: Logger,
    group: LoggerGroup,
    flush: Option<FlushScheduler>,
    worker_flush: Mutex<Vec<FlushScheduler>>,
    signals: Option<JoinHandle<()>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    runtime: Handle,
    background: Option<Runtime>,
    panic_hook: bool,
}

/// Options for [`LogContext`] startup.
pub struct ContextBuilder {
    config: LoggerConfig,
    deps: LoggerDeps,
    signals: bool,
    exit_on_signal: bool,
    panic_hook: bool,
}

impl ContextBuilder {
    /// Listen for termination signals (default: on).
    pub fn signals(mut self, enabled: bool) -> Self {
        self.signals = enabled;
        self
    }

    /// Exit the process with status 0 after a signal-triggered cleanup
    /// (default: on). With this off, await
    /// [`LogContext::shutdown_requested`] instead.
    pub fn exit_on_signal(mut self, exit: bool) -> Self {
        self.exit_on_signal = exit;
        self
    }

    /// Flush on panics, and run cleanup on fatal ones (default: on).
    pub fn panic_hook(mut self, enabled: bool) -> Self {
        self.panic_hook = enabled;
        self
    }

    pub fn deps(mut self, deps: LoggerDeps) -> Self {
        self.deps = deps;
        self
    }

    /// Open the primary logger and start its background tasks.
    pub fn init(self) -> Result<LogContext, LoggerError> {
        let registry = QueueRegistry::new();
        let logger = Logger::open_with(&self.config, &registry, self.deps)?;
        let group = LoggerGroup::new(logger.clone());
        let (tx, _) = watch::channel(false);
        let shutdown_tx = Arc::new(tx);

        let (runtime, background) = match Handle::try_current() {
            Ok(handle) => (handle, None),
            Err(_) => {
                let owned = background_runtime()?;
                (owned.handle().clone(), Some(owned))
            }
        };

        let flush = FlushScheduler::spawn_on(logger.clone(), &runtime);
        let signals = if self.signals {
            // Signal streams register with the runtime they are created in
            let _entered = runtime.enter();
            Some(shutdown::spawn_group_signal_listener(
                group.clone(),
                Arc::clone(&shutdown_tx),
                self.exit_on_signal,
            )?)
        } else {
            None
        };

        if self.panic_hook {
            shutdown::install_panic_hook(&logger);
        }

        debug!(
            destination = ?logger.destination(),
            flushing = flush.is_some(),
            signals = signals.is_some(),
            own_runtime = background.is_some(),
            "log context initialized"
        );
        Ok(LogContext {
            registry,
            logger,
            group,
            flush,
            worker_flush: Mutex::new(Vec::new()),
            signals,
            shutdown_tx,
            runtime,
            background,
            panic_hook: self.panic_hook,
        })
    }
}

fn background_runtime() -> Result<Runtime, LoggerError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("quill-background")
        .enable_all()
        .build()
        .map_err(LoggerError::Runtime)
}

impl LogContext {
    /// Start a context with signal handling and the panic hook enabled.
    pub fn init(config: LoggerConfig) -> Result<Self, LoggerError> {
        Self::builder(config).init()
    }

    pub fn builder(config: LoggerConfig) -> ContextBuilder {
        ContextBuilder {
            config,
            deps: LoggerDeps::default(),
            signals: true,
            exit_on_signal: true,
            panic_hook: true,
        }
    }

    /// The process-wide logger; see [`global`](self::global).
    pub fn global() -> &'static Logger {
        self::global()
    }

    /// The primary logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn registry(&self) -> &QueueRegistry {
        &self.registry
    }

    /// Open another logger on this context's registry.
    ///
    /// A logger on an already registered destination shares its queue and
    /// does not truncate the file. A logger on a new destination gets its own
    /// flush schedule. Either way it is shut down with the context.
    pub fn worker_logger(&self, config: &LoggerConfig) -> Result<Logger, LoggerError> {
        self.worker_logger_with(config, LoggerDeps::default())
    }

    pub fn worker_logger_with(
        &self,
        config: &LoggerConfig,
        deps: LoggerDeps,
    ) -> Result<Logger, LoggerError> {
        let worker = Logger::open_with(config, &self.registry, deps)?;
        if worker.initiates_destination() {
            if let Some(scheduler) = FlushScheduler::spawn_on(worker.clone(), &self.runtime) {
                self.worker_flush.lock().push(scheduler);
            }
        }
        if self.panic_hook {
            shutdown::install_panic_hook(&worker);
        }
        self.group.add(worker.clone());
        debug!(destination = ?worker.destination(), "worker logger opened");
        Ok(worker)
    }

    /// Synchronous flush of the primary logger, outside the tick schedule.
    pub fn flush_now(&self) -> FlushOutcome {
        match &self.flush {
            Some(scheduler) => scheduler.flush_now(),
            None => self.logger.flush(),
        }
    }

    /// Resolves once a termination signal has shut the loggers down.
    pub async fn shutdown_requested(&self) {
        let mut rx = self.shutdown_tx.subscribe();
        // The sender lives in self, so the channel cannot close under us
        let _ = rx.wait_for(|requested| *requested).await;
    }

    /// Non-blocking form of [`shutdown_requested`](Self::shutdown_requested).
    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Flush, rotate, and close the primary logger, then every worker.
    ///
    /// Returns the primary logger's report.
    pub fn teardown(self) -> Result<ShutdownReport, LoggerError> {
        self.group.cleanup(None)
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        let reason = (!self.logger.is_shut_down()).then(|| LogArg::from("log context dropped"));
        shutdown::cleanup_logged(&self.group, reason);

        if let Some(flush) = self.flush.take() {
            flush.abort();
        }
        for scheduler in self.worker_flush.lock().drain(..) {
            scheduler.abort();
        }
        if let Some(signals) = self.signals.take() {
            signals.abort();
        }
        // Does not block, so dropping inside another runtime is fine
        if let Some(background) = self.background.take() {
            background.shutdown_background();
        }
    }
}

impl std::fmt::Debug for LogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogContext")
            .field("logger", &self.logger)
            .field("loggers", &self.group.len())
            .field("flushing", &self.flush.is_some())
            .field("signals", &self.signals.is_some())
            .field("own_runtime", &self.background.is_some())
            .finish()
    }
}

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();
static GLOBAL_CONTEXT: Mutex<Option<LogContext>> = const_mutex(None);

/// Make `ctx` the process-wide context returned by [`global`].
///
/// Fails, handing the context back, if a global logger already exists.
pub fn install_global(ctx: LogContext) -> Result<Logger, LogContext> {
    let logger = ctx.logger().clone();
    if GLOBAL_LOGGER.set(logger.clone()).is_err() {
        return Err(ctx);
    }
    *GLOBAL_CONTEXT.lock() = Some(ctx);
    Ok(logger)
}

/// The process-wide logger.
///
/// If no context was installed, one is started from the environment
/// (`QUILL_*` variables, see [`LoggerConfig::from_env`]). If that fails the
/// global logger writes to the live streams only.
pub fn global() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(|| {
        let started = LoggerConfig::from_env().and_then(LogContext::init);
        match started {
            Ok(ctx) => {
                let logger = ctx.logger().clone();
                *GLOBAL_CONTEXT.lock() = Some(ctx);
                logger
            }
            Err(e) => {
                warn!(error = %e, "default log context failed, logging to streams only");
                Logger::stream_only(&LoggerConfig::default(), LoggerDeps::default())
            }
        }
    })
}

/// Tear down the process-wide context, if any.
pub fn teardown_global() -> Result<ShutdownReport, LoggerError> {
    let ctx = GLOBAL_CONTEXT.lock().take();
    match (ctx, GLOBAL_LOGGER.get()) {
        (Some(ctx), _) => ctx.teardown(),
        (None, Some(logger)) => logger.cleanup(None),
        (None, None) => Ok(ShutdownReport::default()),
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
