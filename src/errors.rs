//! Fatal errors of the harness.
//!
//! Test failures are not errors here: they are [`crate::failure::Failure`]s
//! reported through the notifier. Everything in this module stops a run.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::discovery::resolver::ResolveError;
use crate::discovery::suite::ShapeError;
use crate::failure::ScriptError;

/// Discovery failed; no test runs.
#[derive(Debug, Error, Diagnostic)]
pub enum SetupError {
    #[error("no script engine available (tried {})", .tried.join(", "))]
    #[diagnostic(
        code(scriptunit::setup::no_engine),
        help("build with the `rhai` feature or register an engine")
    )]
    NoEngine { tried: Vec<&'static str> },

    #[error("unknown script engine `{name}`")]
    #[diagnostic(code(scriptunit::setup::unknown_engine), help("available engines: {available}"))]
    UnknownEngine { name: String, available: String },

    #[error("engine `{engine}` cannot expose a host load function")]
    #[diagnostic(code(scriptunit::setup::loader_unsupported))]
    LoaderUnsupported { engine: &'static str },

    #[error("bootstrapping engine `{engine}` failed")]
    #[diagnostic(code(scriptunit::setup::bootstrap))]
    Bootstrap {
        engine: &'static str,
        #[source]
        source: ScriptError,
    },

    #[error("no bundled test utilities for engine `{engine}`")]
    #[diagnostic(code(scriptunit::setup::missing_utilities))]
    MissingUtilities { engine: &'static str },

    #[error("loading test utilities into `{engine}` failed")]
    #[diagnostic(code(scriptunit::setup::utilities))]
    Utilities {
        engine: &'static str,
        #[source]
        source: ScriptError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error("evaluating suite `{suite}` failed")]
    #[diagnostic(code(scriptunit::setup::evaluate))]
    Evaluate {
        suite: String,
        #[source]
        source: ScriptError,
    },

    #[error("suite `{suite}` did not evaluate to a list of tests")]
    #[diagnostic(
        code(scriptunit::setup::shape),
        help("a suite script must end with a list of records, each with `name` and `run`")
    )]
    Shape {
        suite: String,
        #[source]
        source: ShapeError,
    },

    #[error("could not read config file {}", .path.display())]
    #[diagnostic(code(scriptunit::setup::config_read))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    #[diagnostic(code(scriptunit::setup::config))]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A thrown error could not be reduced to a host failure.
#[derive(Debug, Error, Diagnostic)]
pub enum NormalizeError {
    #[error("`{engine}` script threw `{value}`, which is not a host failure")]
    #[diagnostic(
        code(scriptunit::normalize::unwrap),
        help("throw a value built by `assertion-failure` or `comparison-failure`")
    )]
    Unwrap { engine: &'static str, value: String },
}

/// The run stopped before every test was reported.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("test `{test}` failed in a way that could not be reported")]
    #[diagnostic(code(scriptunit::run::normalize))]
    Normalize {
        test: String,
        #[source]
        #[diagnostic_source]
        source: NormalizeError,
    },
}
