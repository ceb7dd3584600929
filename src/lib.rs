//! # scriptunit
//!
//! Runs test suites written in embedded scripting languages.
//!
//! A run has two phases. Discovery selects an engine, loads the bundled test
//! utilities, evaluates every suite script into a list of named test cases
//! and builds a [`Description`] tree. Execution then invokes each test body
//! in order, isolates its failure, and reports the *original* failure
//! (see [`normalize`]) to a [`RunNotifier`].
//!
//! ```no_run
//! use scriptunit::{EngineRegistry, HarnessConfig, RecordingNotifier, Runner};
//!
//! let config = HarnessConfig {
//!     root: "tests/scripts/rhai".into(),
//!     suites: vec!["Math".into()],
//!     ..HarnessConfig::default()
//! };
//! let mut runner = Runner::from_config(&config, &EngineRegistry::with_defaults())?;
//! let mut notifier = RecordingNotifier::new();
//! let summary = runner.run(&mut notifier)?;
//! println!("{} passed, {} failed", summary.passed, summary.failed);
//! # Ok::<(), miette::Report>(())
//! ```

pub mod atoms;
pub mod cli;
pub mod config;
pub mod description;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod failure;
pub mod normalize;
pub mod runtime;
pub mod stub;
pub mod syntax;

pub use config::HarnessConfig;
pub use description::{build_description, Description, TestId};
pub use discovery::{Suite, TestCase};
pub use engine::{EngineRegistry, HostValue, ScriptEngine};
pub use errors::{NormalizeError, RunError, SetupError};
pub use failure::{Failure, ScriptError};
pub use normalize::normalize;
pub use test::{RecordingNotifier, RunEvent, RunNotifier, RunSummary, Runner};
