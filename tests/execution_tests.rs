//! Execution: event order, failure isolation and failure normalization.

mod common;

use std::fs;

use common::{finished, started};
use scriptunit::{EngineRegistry, Failure, HarnessConfig, RecordingNotifier, RunError, RunEvent, Runner};

fn assert_passing_suite(engine: &str) {
    let (summary, notifier) = common::run(engine, &["Math"]);

    assert_eq!(
        notifier.events(),
        [
            RunEvent::RunStarted {
                name: "fixtures".to_string(),
                tests: 2
            },
            started("Math", "addsNumbers"),
            finished("Math", "addsNumbers"),
            started("Math", "multiplies"),
            finished("Math", "multiplies"),
            RunEvent::RunFinished {
                passed: 2,
                failed: 0
            },
        ]
    );
    assert!(summary.is_success());
    assert_eq!(summary.run, 2);
}

/// The reported failure is the one the script built, not the engine's wrapper.
fn assert_original_failures(engine: &str) {
    let (summary, notifier) = common::run(engine, &["Failing"]);
    common::assert_well_formed(notifier.events());

    let failures = notifier.failures();
    assert_eq!(failures.len(), 3);

    assert_eq!(failures[0].0, &common::id("Failing", "wrongSum"));
    assert_eq!(
        **failures[0].1,
        Failure::comparison("Expected <3> but was <2>", "3", "2")
    );
    assert_eq!(failures[0].1.kind(), "ComparisonFailure");

    assert_eq!(failures[1].0, &common::id("Failing", "explicitFail"));
    assert_eq!(**failures[1].1, Failure::assertion("not implemented"));

    assert_eq!(failures[2].1.kind(), "ScriptError");

    assert!(notifier
        .events()
        .contains(&finished("Failing", "stillRuns")));
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 3);
    assert!(!summary.is_success());
}

/// A throws, B passes: both are reported and B is unaffected.
fn assert_isolation(engine: &str) {
    let (summary, notifier) = common::run(engine, &["A", "B"]);
    common::assert_well_formed(notifier.events());

    let events = notifier.events();
    assert_eq!(events[1], started("A", "throws"));
    assert!(matches!(
        &events[2],
        RunEvent::TestFailure { id, failure }
            if id == &common::id("A", "throws") && failure.to_string() == "A is broken"
    ));
    assert_eq!(events[3], started("B", "passes"));
    assert_eq!(events[4], finished("B", "passes"));
    assert_eq!((summary.passed, summary.failed), (1, 1));
}

fn assert_loaded_code_runs(engine: &str) {
    let (summary, notifier) = common::run(engine, &["UnderTest"]);
    assert!(notifier.failures().is_empty(), "{:?}", notifier.failures());
    assert_eq!(summary.passed, 2);
}

/// Stubs record calls, and `tests` runs cases in the order the suite declares them.
fn assert_stub_suite(engine: &str) {
    let (summary, notifier) = common::run(engine, &["Stubs"]);
    common::assert_well_formed(notifier.events());

    let events = notifier.events();
    assert_eq!(events[1], started("Stubs", "callsImportantFunction"));
    assert_eq!(events[2], finished("Stubs", "callsImportantFunction"));
    assert_eq!(events[3], started("Stubs", "wrongArguments"));
    assert_eq!(events[5], started("Stubs", "logsToConsole"));
    assert_eq!(events[6], finished("Stubs", "logsToConsole"));

    let failures = notifier.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, &common::id("Stubs", "wrongArguments"));
    assert_eq!(
        **failures[0].1,
        Failure::assertion(
            "No matching functions called. expected: <important_function(goodbye,world)> \
             but had <important_function(hello,world)>"
        )
    );
    assert_eq!((summary.passed, summary.failed), (2, 1));
}

#[test]
fn sutra_passing_tests_start_and_finish() {
    assert_passing_suite("sutra");
}

#[test]
fn sutra_failures_are_unwrapped() {
    assert_original_failures("sutra");
}

#[test]
fn sutra_interpreter_faults_are_script_errors() {
    let (_, notifier) = common::run("sutra", &["Failing"]);
    let failures = notifier.failures();
    assert_eq!(failures[2].0, &common::id("Failing", "undefinedSymbol"));
    let Failure::Script { engine, message } = &**failures[2].1 else {
        panic!("expected a script error, got {:?}", failures[2].1);
    };
    assert_eq!(*engine, "sutra");
    assert!(message.contains("no-such-function"), "{message}");
}

#[test]
fn sutra_failing_test_does_not_affect_the_next() {
    assert_isolation("sutra");
}

#[test]
fn sutra_suites_run_loaded_code() {
    assert_loaded_code_runs("sutra");
}

#[test]
fn sutra_stubs_verify_calls_in_declared_order() {
    assert_stub_suite("sutra");
}

#[test]
fn sutra_throwing_a_non_failure_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Odd.sutra"),
        r#"(list (test "throwsText" (fn () (throw "oops"))) (test "never" (fn () nil)))"#,
    )
    .unwrap();
    let config = HarnessConfig {
        root: dir.path().to_path_buf(),
        engine: Some("sutra".to_string()),
        ..HarnessConfig::default()
    };
    let mut runner = Runner::from_config(&config, &EngineRegistry::with_defaults()).unwrap();
    let mut notifier = RecordingNotifier::new();

    let err = runner.run(&mut notifier).expect_err("run should stop");
    let RunError::Normalize { test, .. } = err;
    assert_eq!(test, "throwsText(Odd)");
    assert!(!notifier.events().contains(&started("Odd", "never")));
}

#[test]
fn runs_are_repeatable() {
    let mut runner = common::discover("sutra", &["A", "B"]).unwrap();
    let mut first = RecordingNotifier::new();
    let mut second = RecordingNotifier::new();
    runner.run(&mut first).unwrap();
    runner.run(&mut second).unwrap();
    assert_eq!(first.events(), second.events());
}

#[cfg(feature = "rhai")]
mod rhai {
    use super::*;

    #[test]
    fn passing_tests_start_and_finish() {
        assert_passing_suite("rhai");
    }

    #[test]
    fn failures_are_unwrapped() {
        assert_original_failures("rhai");
    }

    #[test]
    fn plain_throws_report_the_engine_error() {
        let (_, notifier) = common::run("rhai", &["Failing"]);
        let failures = notifier.failures();
        assert_eq!(failures[2].0, &common::id("Failing", "plainThrow"));
        let Failure::Script { engine, message } = &**failures[2].1 else {
            panic!("expected a script error, got {:?}", failures[2].1);
        };
        assert_eq!(*engine, "rhai");
        assert!(message.contains("plain text"), "{message}");
    }

    #[test]
    fn failing_test_does_not_affect_the_next() {
        assert_isolation("rhai");
    }

    #[test]
    fn suites_import_code_under_test() {
        assert_loaded_code_runs("rhai");
    }

    #[test]
    fn stubs_verify_calls_in_declared_order() {
        assert_stub_suite("rhai");
    }

    #[test]
    fn whole_root_runs_in_one_engine() {
        let (summary, notifier) = common::run("rhai", &[]);
        common::assert_well_formed(notifier.events());
        assert_eq!(summary.run, 13);
        assert_eq!(summary.failed, 5);
    }
}
