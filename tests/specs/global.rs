//! Process-wide logger specs
//!
//! The global logger starts lazily from `QUILL_*` environment variables.
//! Only this spec touches the global in this test binary.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn global_logger_starts_from_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("QUILL_LOG_DIR", dir.path());
    std::env::set_var("QUILL_LOG_FILE", "global.txt");
    std::env::set_var("QUILL_LEVEL", "warning");
    std::env::remove_var("QUILL_CONFIG");

    let logger = quill::global();
    logger.log(["from anywhere"]);
    let report = quill::teardown_global().unwrap();

    std::env::remove_var("QUILL_LOG_DIR");
    std::env::remove_var("QUILL_LOG_FILE");
    std::env::remove_var("QUILL_LEVEL");

    assert_eq!(logger.level(), Level::Warning);
    assert_eq!(report.flushed, 1);
    let contents = read(&dir.path().join("global.txt"));
    assert!(contents.ends_with("WARNING]: from anywhere\n"), "got {contents:?}");
    assert!(report.archive.is_some());
    assert!(std::ptr::eq(logger, quill::global()));
}
