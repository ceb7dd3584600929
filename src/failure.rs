//! Host failures and the tagged errors produced at the engine boundary.
//!
//! A [`Failure`] is what ends up in a report. Scripts build failures through
//! functions each engine registers (`assertion_failure`, `comparison-failure`,
//! ...), so the object thrown inside the script is the same `Arc` the harness
//! reports. Engines never hand raw engine errors to the runner: they tag every
//! error as one [`ScriptError`] variant at the point where they catch it.

use std::sync::Arc;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

pub use crate::engine::sutra::InterpretedWrapper;

/// A failure raised by a test body, as the harness reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Error, Diagnostic)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    #[error("{message}")]
    #[diagnostic(code(scriptunit::failure::assertion))]
    Assertion { message: String },

    #[error("{message}")]
    #[diagnostic(code(scriptunit::failure::comparison))]
    Comparison {
        message: String,
        expected: String,
        actual: String,
    },

    #[error("{engine}: {message}")]
    #[diagnostic(code(scriptunit::failure::script))]
    Script {
        engine: &'static str,
        message: String,
    },

    #[error("test body panicked: {message}")]
    #[diagnostic(code(scriptunit::failure::panic))]
    Panic { message: String },
}

impl Failure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    pub fn comparison(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Comparison {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn script(engine: &'static str, message: impl Into<String>) -> Self {
        Self::Script {
            engine,
            message: message.into(),
        }
    }

    pub fn panic(message: impl Into<String>) -> Self {
        Self::Panic {
            message: message.into(),
        }
    }

    /// Short type label used by reporters.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Assertion { .. } => "AssertionFailure",
            Failure::Comparison { .. } => "ComparisonFailure",
            Failure::Script { .. } => "ScriptError",
            Failure::Panic { .. } => "Panic",
        }
    }
}

/// Error from the preferred (compiled) engine.
///
/// The wrapper describes the engine error itself; `cause` is the host failure
/// the script threw, when there was one.
#[derive(Debug, Clone, Error)]
#[error("{failure}")]
pub struct CompiledWrapper {
    failure: Arc<Failure>,
    #[source]
    cause: Option<Arc<Failure>>,
}

impl CompiledWrapper {
    pub fn new(engine: &'static str, message: impl Into<String>, cause: Option<Arc<Failure>>) -> Self {
        Self {
            failure: Arc::new(Failure::script(engine, message)),
            cause,
        }
    }

    pub fn failure(&self) -> &Arc<Failure> {
        &self.failure
    }

    pub fn cause(&self) -> Option<&Arc<Failure>> {
        self.cause.as_ref()
    }
}

/// Everything an engine can raise while evaluating or invoking script code.
#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    /// Already a plain host failure.
    #[error(transparent)]
    Native(Arc<Failure>),
    /// Raised by the compiled engine.
    #[error(transparent)]
    Compiled(CompiledWrapper),
    /// Raised by the interpreted engine through `throw`.
    #[error(transparent)]
    Interpreted(InterpretedWrapper),
}

impl ScriptError {
    pub fn native(failure: Failure) -> Self {
        Self::Native(Arc::new(failure))
    }
}

impl From<Failure> for ScriptError {
    fn from(failure: Failure) -> Self {
        Self::native(failure)
    }
}
