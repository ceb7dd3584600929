//! Discovery: engine selection, suite loading and the description tree.

mod common;

use std::fs;

use scriptunit::discovery::resolver::ResolveError;
use scriptunit::discovery::{discover_suite_names, ShapeError};
use scriptunit::engine::sutra::SutraEngine;
use scriptunit::{EngineRegistry, HarnessConfig, Runner, SetupError};

fn assert_fixture_tree(engine: &str) {
    let runner = common::discover(engine, &["Math", "Failing"]).unwrap();
    let root = runner.description();

    assert_eq!(root.name(), "fixtures");
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].name(), "Math");
    assert_eq!(root.children()[1].name(), "Failing");
    assert!(root.children().iter().all(|suite| suite.is_suite()));
    assert_eq!(root.children()[0].children().len(), 2);
    assert_eq!(root.test_count(), 6);

    let names: Vec<_> = root.children()[0]
        .children()
        .iter()
        .map(|test| test.display_name())
        .collect();
    assert_eq!(names, ["addsNumbers(Math)", "multiplies(Math)"]);
}

#[test]
fn sutra_suites_become_a_description_tree() {
    assert_fixture_tree("sutra");
}

#[cfg(feature = "rhai")]
#[test]
fn rhai_suites_become_a_description_tree() {
    assert_fixture_tree("rhai");
}

#[test]
fn helper_scripts_are_not_suites() {
    let names = discover_suite_names(&common::scripts_root("sutra"), "sutra").unwrap();
    assert_eq!(names, ["A", "B", "Failing", "Math", "Stubs", "UnderTest"]);
}

#[test]
fn empty_suite_list_discovers_the_whole_root() {
    let runner = common::discover("sutra", &[]).unwrap();
    let suites: Vec<_> = runner.suites().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(suites, ["A", "B", "Failing", "Math", "Stubs", "UnderTest"]);
}

#[test]
fn suites_can_load_code_under_test() {
    let runner = common::discover("sutra", &["UnderTest"]).unwrap();
    assert_eq!(runner.description().test_count(), 2);
}

#[test]
fn one_missing_suite_fails_the_whole_discovery() {
    let err = common::discover("sutra", &["Math", "Missing"])
        .err()
        .expect("discovery should fail");
    assert!(matches!(
        err,
        SetupError::Resolve(ResolveError::NotFound { ref name, .. }) if name == "Missing"
    ));
}

#[test]
fn script_errors_during_discovery_name_the_suite() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Broken.sutra"), "(undefined-thing 1)").unwrap();
    let config = HarnessConfig {
        root: dir.path().to_path_buf(),
        engine: Some("sutra".to_string()),
        ..HarnessConfig::default()
    };

    let err = Runner::from_config(&config, &EngineRegistry::with_defaults())
        .err()
        .expect("discovery should fail");
    assert!(matches!(err, SetupError::Evaluate { ref suite, .. } if suite == "Broken"));
}

#[test]
fn suites_must_evaluate_to_test_records() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Numbers.sutra"), "(list 1 2)").unwrap();
    let config = HarnessConfig {
        root: dir.path().to_path_buf(),
        engine: Some("sutra".to_string()),
        ..HarnessConfig::default()
    };

    let err = Runner::from_config(&config, &EngineRegistry::with_defaults())
        .err()
        .expect("discovery should fail");
    assert!(matches!(
        err,
        SetupError::Shape {
            source: ShapeError::NotARecord { index: 0, .. },
            ..
        }
    ));
}

#[test]
fn no_engine_available_is_a_setup_error() {
    let config = HarnessConfig {
        root: common::scripts_root("sutra"),
        ..HarnessConfig::default()
    };
    let err = Runner::from_config(&config, &EngineRegistry::empty())
        .err()
        .expect("no engine should be found");
    assert!(matches!(err, SetupError::NoEngine { .. }));
}

#[test]
fn unknown_engine_lists_what_is_available() {
    let err = common::discover("lua", &["Math"])
        .err()
        .expect("lua is not an engine");
    let SetupError::UnknownEngine { name, available } = err else {
        panic!("expected UnknownEngine, got {err:?}");
    };
    assert_eq!(name, "lua");
    assert!(available.contains("sutra"));
}

#[test]
fn fallback_is_selected_when_it_is_the_only_engine() {
    let mut registry = EngineRegistry::empty();
    registry.register("sutra", SutraEngine::boxed);
    let config = HarnessConfig {
        root: common::scripts_root("sutra"),
        suites: vec!["UnderTest".to_string()],
        ..HarnessConfig::default()
    };

    let runner = Runner::from_config(&config, &registry).unwrap();
    assert_eq!(runner.engine_name(), "sutra");
    assert_eq!(runner.description().name(), "scripts");
}

#[cfg(feature = "rhai")]
#[test]
fn preferred_engine_wins_automatic_selection() {
    let config = HarnessConfig {
        root: common::scripts_root("rhai"),
        suites: vec!["Math".to_string()],
        ..HarnessConfig::default()
    };
    let runner = Runner::from_config(&config, &EngineRegistry::with_defaults()).unwrap();
    assert_eq!(runner.engine_name(), "rhai");
}
