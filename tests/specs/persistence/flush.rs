//! Flush specs
//!
//! Verify that logging never writes the file, that flushes append in FIFO
//! order, and that a skipped flush loses and duplicates nothing.

use crate::prelude::*;
use quill::{FlushOutcome, FlushScheduler};
use std::time::Duration;

#[test]
fn nothing_reaches_the_file_until_a_flush() {
    let h = harness();
    let opened = h.logger();

    opened.logger.info(["buffered"]);
    similar_asserts::assert_eq!(h.file(), "");

    opened.logger.flush();
    similar_asserts::assert_eq!(h.file(), "[INFO] buffered\n");
}

#[test]
fn skipped_flush_keeps_lines_for_the_next_one() {
    let h = harness();
    let opened = h.logger();
    opened.logger.info(["one"]);
    let dest = h.registry.get(&h.path("latest.txt")).unwrap();

    let held = dest.gate();
    assert_eq!(opened.logger.flush(), FlushOutcome::Skipped);
    opened.logger.info(["two"]);
    drop(held);

    assert!(matches!(
        opened.logger.flush(),
        FlushOutcome::Written { lines: 2, .. }
    ));
    assert_eq!(opened.logger.flush(), FlushOutcome::Empty);
    similar_asserts::assert_eq!(h.file(), "[INFO] one\n[INFO] two\n");
}

#[test]
fn per_thread_order_survives_concurrent_logging_and_flushing() {
    let h = harness();
    let opened = h.logger();
    let threads = 4;
    let per_thread = 250;

    std::thread::scope(|s| {
        for t in 0..threads {
            let logger = opened.logger.clone();
            s.spawn(move || {
                for i in 0..per_thread {
                    logger.info([format!("t{t} {i}")]);
                    if i % 50 == 0 {
                        logger.flush();
                    }
                }
            });
        }
    });
    opened.logger.flush();

    let file = h.file();
    assert_eq!(file.lines().count(), threads * per_thread);
    for t in 0..threads {
        let prefix = format!("[INFO] t{t} ");
        let seen: Vec<usize> = file
            .lines()
            .filter_map(|line| line.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seen, (0..per_thread).collect::<Vec<_>>());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduler_flushes_without_explicit_calls() {
    let h = harness();
    let opened = h.open(&h.config().with_flush_interval(Duration::from_millis(10)));
    let _scheduler = FlushScheduler::spawn(opened.logger.clone()).unwrap();

    for i in 0..5 {
        opened.logger.info([format!("beat {i}")]);
    }

    assert!(wait_for(|| h.file().lines().count() == 5).await);
    assert!(h.file().starts_with("[INFO] beat 0\n"));
}
