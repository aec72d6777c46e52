// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! quill daemon (quilld)
//!
//! Emits a heartbeat line on an interval until a termination signal arrives
//! or the configured number of beats has been written, then flushes and
//! rotates its log.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::time::Duration;

use quill::{env, LogContext, LoggerConfig, LoggerLayer};
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("quilld {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("quilld {}", env!("CARGO_PKG_VERSION"));
                println!("quill daemon - writes a heartbeat to a buffered, rotated log");
                println!();
                println!("USAGE:");
                println!("    quilld");
                println!();
                println!("Runs until SIGINT, SIGTERM, SIGUSR1 or SIGUSR2, then flushes the");
                println!("log file and copies it to a dated archive next to it.");
                println!();
                println!("ENVIRONMENT:");
                println!("    QUILL_CONFIG             TOML config file");
                println!("    QUILL_LOG_DIR            Log directory (empty: no file)");
                println!("    QUILL_LOG_FILE           Log file name (empty: no file)");
                println!("    QUILL_LEVEL              Default level");
                println!("    QUILL_FLUSH_MS           Flush interval in milliseconds");
                println!("    QUILL_HEARTBEAT_MS       Heartbeat interval in milliseconds");
                println!("    QUILL_HEARTBEAT_COUNT    Exit after this many heartbeats");
                println!("    NO_COLOR=1               Disable colored output");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: quilld [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = LoggerConfig::from_env()?;
    let ctx = LogContext::builder(config).exit_on_signal(false).init()?;
    setup_tracing(&ctx);

    info!(destination = ?ctx.logger().destination(), "quilld started");

    let beats = env::heartbeat_count();
    let mut interval = tokio::time::interval(env::heartbeat_interval().unwrap_or(DEFAULT_HEARTBEAT));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut beat: u64 = 0;
    loop {
        tokio::select! {
            _ = ctx.shutdown_requested() => {
                info!("shutdown requested by signal");
                break;
            }
            _ = interval.tick() => {
                beat += 1;
                info!(target: "app", beat, "heartbeat");
                if beats.is_some_and(|max| beat >= max) {
                    break;
                }
            }
        }
    }

    let report = ctx.teardown()?;
    info!(
        flushed = report.flushed,
        archive = ?report.archive,
        already_shut_down = report.already_shut_down,
        "quilld stopped"
    );
    Ok(())
}

/// Bridge `tracing` events into the logger, and print quilld's own
/// diagnostics to stderr filtered by `RUST_LOG` (default: warn).
fn setup_tracing(ctx: &LogContext) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let diagnostics = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_filter(filter);

    let _ = tracing_subscriber::registry()
        .with(LoggerLayer::new(ctx.logger().clone()))
        .with(diagnostics)
        .try_init();
}
