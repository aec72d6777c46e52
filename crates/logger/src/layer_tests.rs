// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::setup;
use tracing_subscriber::layer::SubscriberExt;

fn with_layer(logger: &Logger, f: impl FnOnce()) {
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger.clone()));
    tracing::subscriber::with_default(subscriber, f);
}

#[yare::parameterized(
    trace = { tracing::Level::TRACE, Level::Debug },
    debug = { tracing::Level::DEBUG, Level::Debug },
    info  = { tracing::Level::INFO,  Level::Info },
    warn  = { tracing::Level::WARN,  Level::Warning },
    error = { tracing::Level::ERROR, Level::Error },
)]
fn levels_map(from: tracing::Level, to: Level) {
    assert_eq!(level_of(&from), to);
}

#[test]
fn events_become_records() {
    let t = setup();

    with_layer(&t.logger, || {
        tracing::info!(target: "app", "service started");
        tracing::error!(target: "app", "request failed");
    });

    assert_eq!(t.out.contents(), "[INFO] service started\n");
    assert_eq!(t.err.contents(), "[ERROR] request failed\n");
    assert_eq!(t.logger.pending(), 2);
}

#[test]
fn fields_follow_the_message() {
    let t = setup();

    with_layer(&t.logger, || {
        tracing::warn!(target: "app", attempt = 3, host = "db1", "retrying");
    });

    assert_eq!(t.out.contents(), "[WARNING] retrying attempt=3 host=db1\n");
}

#[test]
fn fields_without_message() {
    let t = setup();

    with_layer(&t.logger, || {
        tracing::info!(target: "app", beat = 7);
    });

    assert_eq!(t.out.contents(), "[INFO] beat=7\n");
}

#[yare::parameterized(
    root        = { "quill", true },
    module      = { "quill::flush", true },
    storage     = { "quill_storage::archive", true },
    daemon      = { "quilld", true },
    longer_name = { "quillpen", false },
    sibling     = { "quill_extras::render", false },
    nested      = { "app::quill", false },
)]
fn own_targets(target: &str, own: bool) {
    assert_eq!(is_own_target(target), own);
}

#[test]
fn host_crates_with_similar_names_are_forwarded() {
    let t = setup();

    with_layer(&t.logger, || {
        tracing::info!(target: "quillpen::editor", "saved");
    });

    assert_eq!(t.out.contents(), "[INFO] saved\n");
}

#[test]
fn own_diagnostics_are_not_forwarded() {
    let t = setup();

    with_layer(&t.logger, || {
        tracing::warn!(target: "quill::flush", "internal");
        tracing::debug!(target: "quill_storage::archive", "internal");
        t.logger.flush();
    });

    assert_eq!(t.out.contents(), "");
    assert_eq!(t.err.contents(), "");
}
