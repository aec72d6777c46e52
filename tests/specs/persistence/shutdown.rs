//! Shutdown specs
//!
//! Verify that cleanup persists every queued line, archives without ever
//! replacing an earlier archive, and only runs once.

use crate::prelude::*;

#[test]
fn cleanup_persists_everything_logged_before_it() {
    let h = harness();
    let opened = h.logger();
    for i in 0..1000 {
        opened.logger.info([format!("line {i}")]);
    }

    let report = opened.logger.cleanup(None).unwrap();

    assert_eq!(report.flushed, 1000);
    assert_eq!(h.file().lines().count(), 1000);
    assert!(h.file().ends_with("[INFO] line 999\n"));
}

#[test]
fn reason_is_the_last_persisted_line() {
    let h = harness();
    let opened = h.logger();
    opened.logger.info(["work"]);

    opened
        .logger
        .cleanup(Some(LogArg::from("received SIGINT")))
        .unwrap();

    similar_asserts::assert_eq!(h.file(), "[INFO] work\n[CRITICAL] received SIGINT\n");
    assert_eq!(opened.err.contents(), "[CRITICAL] received SIGINT\n");
}

#[test]
fn archives_from_earlier_runs_are_never_replaced() {
    let h = harness();
    std::fs::write(h.path("2024-1-1-0.log"), "run 0\n").unwrap();
    std::fs::write(h.path("2024-1-1-1.log"), "run 1\n").unwrap();
    let opened = h.logger();
    opened.logger.info(["run 2"]);

    let report = opened.logger.cleanup(None).unwrap();

    assert_eq!(report.archive, Some(h.path("2024-1-1-2.log")));
    assert_eq!(read(&h.path("2024-1-1-0.log")), "run 0\n");
    assert_eq!(read(&h.path("2024-1-1-1.log")), "run 1\n");
    assert_eq!(read(&h.path("2024-1-1-2.log")), "[INFO] run 2\n");
}

#[test]
fn restart_truncates_the_live_file_only() {
    let h = harness();
    let first = h.logger();
    first.logger.info(["first run"]);
    first.logger.cleanup(None).unwrap();

    let second = h.logger();
    second.logger.info(["second run"]);
    second.logger.cleanup(None).unwrap();

    similar_asserts::assert_eq!(h.file(), "[INFO] second run\n");
    assert_eq!(h.archives(), vec!["2024-1-1-0.log", "2024-1-1-1.log"]);
    assert_eq!(read(&h.path("2024-1-1-0.log")), "[INFO] first run\n");
}

#[test]
fn cleanup_is_one_shot() {
    let h = harness();
    let opened = h.logger();

    let first = opened.logger.cleanup(Some(LogArg::from("bye"))).unwrap();
    let second = opened.logger.cleanup(Some(LogArg::from("bye"))).unwrap();

    assert!(!first.already_shut_down);
    assert!(second.already_shut_down);
    similar_asserts::assert_eq!(h.file(), "[CRITICAL] bye\n");
    assert_eq!(h.archives().len(), 1);
}

#[test]
fn logging_after_cleanup_goes_nowhere() {
    let h = harness();
    let opened = h.logger();
    opened.logger.cleanup(None).unwrap();

    opened.logger.info(["late"]);
    opened.logger.raw(["late raw"]);

    assert_eq!(opened.out.contents(), "");
    similar_asserts::assert_eq!(h.file(), "");
    assert_eq!(opened.logger.pending(), 0);
}
