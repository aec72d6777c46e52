//! Record formatting specs
//!
//! Verify template rendering, stream routing, and that the persisted copy
//! never carries terminal markup.

use crate::prelude::*;

#[test]
fn default_template_renders_time_thread_level_and_message() {
    let h = harness();
    h.clock.set(
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_milli_opt(9, 5, 7, 42)
            .unwrap(),
    );
    let config = LoggerConfig::default()
        .with_color(false)
        .with_log_dir(h.dir.path());
    let opened = h.open(&config);

    let logger = opened.logger.clone();
    std::thread::Builder::new()
        .name("render".into())
        .spawn(move || logger.info(["ready", "now"]))
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(opened.out.contents(), "[09:05:07] [render/INFO]: ready now\n");
}

#[test]
fn every_placeholder_is_substituted_once() {
    let h = harness();
    h.clock.set(
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_milli_opt(9, 5, 7, 42)
            .unwrap(),
    );
    let config = h
        .config()
        .with_template("%hh%:%mm%:%ss%.%ms% %level% %message% %level%");
    let opened = h.open(&config);

    opened.logger.warn(["x"]);

    assert_eq!(opened.out.contents(), "09:05:07.042 WARNING x %level%\n");
}

#[test]
fn errors_and_criticals_go_to_the_error_stream() {
    let h = harness();
    let opened = h.logger();

    opened.logger.debug(["d"]);
    opened.logger.info(["i"]);
    opened.logger.warn(["w"]);
    opened.logger.error(["e"]);
    opened.logger.critical(["c"]);

    assert_eq!(opened.out.contents(), "[DEBUG] d\n[INFO] i\n[WARNING] w\n");
    assert_eq!(opened.err.contents(), "[ERROR] e\n[CRITICAL] c\n");
}

#[test]
fn colored_levels_reach_the_terminal_but_not_the_file() {
    let h = harness();
    let opened = h.open(&h.config().with_color(true));

    opened.logger.error(["\x1b]0;title\x07failed \x1b[1mbadly\x1b[0m"]);
    opened.logger.cleanup(None).unwrap();

    let live = opened.err.contents();
    assert!(live.contains("\x1b[31mERROR"), "got {live:?}");
    similar_asserts::assert_eq!(h.file(), "[ERROR] failed badly\n");
}

#[test]
fn error_arguments_include_their_causes() {
    #[derive(Debug)]
    struct Outer(std::io::Error);
    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("could not save")
        }
    }
    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    let h = harness();
    let opened = h.logger();
    let err = Outer(std::io::Error::other("disk full"));

    opened.logger.error([LogArg::error(&err)]);

    assert_eq!(
        opened.err.contents(),
        "[ERROR] could not save\n    caused by: disk full\n"
    );
}

#[test]
fn unformattable_values_degrade_to_a_placeholder() {
    struct Broken;
    impl std::fmt::Debug for Broken {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            Err(std::fmt::Error)
        }
    }

    let h = harness();
    let opened = h.logger();

    opened.logger.info([LogArg::from("value:"), LogArg::debug(&Broken)]);

    assert_eq!(opened.out.contents(), "[INFO] value: <unformattable value>\n");
}
