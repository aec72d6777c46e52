//! Worker logger specs
//!
//! Verify that loggers opened on the same registry and destination share a
//! queue, that late joiners do not truncate, and that the file is rotated
//! exactly once.

use crate::prelude::*;

#[test]
fn workers_share_one_queue_and_one_file() {
    let h = harness();
    let main = h.logger();
    main.logger.info(["main starting"]);

    std::thread::scope(|s| {
        for w in 0..3 {
            let worker = h.logger();
            s.spawn(move || {
                for i in 0..10 {
                    worker.logger.info([format!("worker {w} step {i}")]);
                }
            });
        }
    });

    assert_eq!(main.logger.pending(), 31);
    main.logger.flush();
    let file = h.file();
    assert!(file.starts_with("[INFO] main starting\n"));
    assert_eq!(file.lines().count(), 31);
}

#[test]
fn joining_logger_keeps_existing_lines() {
    let h = harness();
    let main = h.logger();
    main.logger.info(["before worker"]);
    main.logger.flush();

    let worker = h.logger();
    worker.logger.info(["from worker"]);
    worker.logger.flush();

    similar_asserts::assert_eq!(h.file(), "[INFO] before worker\n[INFO] from worker\n");
}

#[test]
fn destination_is_rotated_once() {
    let h = harness();
    let main = h.logger();
    let worker = h.logger();
    worker.logger.info(["worker done"]);
    main.logger.info(["main done"]);

    let worker_report = worker.logger.cleanup(None).unwrap();
    let main_report = main.logger.cleanup(None).unwrap();

    assert!(worker_report.archive.is_some());
    assert!(main_report.archive.is_none());
    assert_eq!(h.archives().len(), 1);
    assert_eq!(worker_report.flushed, 2);
    assert_eq!(main_report.flushed, 0);
    similar_asserts::assert_eq!(h.file(), "[INFO] worker done\n[INFO] main done\n");
    assert!(main.logger.is_shut_down());
}
