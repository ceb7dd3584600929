//! Shared setup for the integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use scriptunit::{
    EngineRegistry, HarnessConfig, RecordingNotifier, RunEvent, RunSummary, Runner, SetupError,
    TestId,
};

/// Fixture suites for one engine.
pub fn scripts_root(engine: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scripts")
        .join(engine)
}

pub fn config(engine: &str, suites: &[&str]) -> HarnessConfig {
    HarnessConfig {
        name: "fixtures".to_string(),
        root: scripts_root(engine),
        engine: Some(engine.to_string()),
        suites: suites.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn discover(engine: &str, suites: &[&str]) -> Result<Runner, SetupError> {
    Runner::from_config(&config(engine, suites), &EngineRegistry::with_defaults())
}

/// Discovers and runs `suites`, panicking on setup or fatal run errors.
pub fn run(engine: &str, suites: &[&str]) -> (RunSummary, RecordingNotifier) {
    let mut runner = discover(engine, suites).unwrap();
    let mut notifier = RecordingNotifier::new();
    let summary = runner.run(&mut notifier).unwrap();
    (summary, notifier)
}

pub fn id(suite: &str, test: &str) -> TestId {
    TestId::new(suite, test)
}

pub fn started(suite: &str, test: &str) -> RunEvent {
    RunEvent::TestStarted { id: id(suite, test) }
}

pub fn finished(suite: &str, test: &str) -> RunEvent {
    RunEvent::TestFinished { id: id(suite, test) }
}

/// Every test gets a start followed by exactly one outcome.
pub fn assert_well_formed(events: &[RunEvent]) {
    let mut open: Option<&TestId> = None;
    for event in events {
        match event {
            RunEvent::TestStarted { id } => {
                assert!(open.is_none(), "{} started inside another test", id);
                open = Some(id);
            }
            RunEvent::TestFinished { id } | RunEvent::TestFailure { id, .. } => {
                assert_eq!(open.take(), Some(id), "outcome without a matching start");
            }
            RunEvent::RunStarted { .. } | RunEvent::RunFinished { .. } => {
                assert!(open.is_none(), "run event inside a test");
            }
        }
    }
    assert!(open.is_none(), "test never finished");
}
