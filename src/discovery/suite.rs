//! Loading one suite script and validating what it returns.

use std::collections::HashSet;

use miette::Diagnostic;
use thiserror::Error;

use super::resolver::ResourceResolver;
use crate::engine::{CallableId, HostValue, ScriptEngine};
use crate::errors::SetupError;

/// A named group of tests from one script, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub name: String,
    pub test_cases: Vec<TestCase>,
}

/// One test: a name unique within its suite and a zero-argument body.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub body: CallableId,
}

/// Why a suite's value is not a list of tests.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ShapeError {
    #[error("expected a list of tests, got {actual}")]
    NotAList { actual: &'static str },

    #[error("test at index {index} is a {actual}, not a record")]
    NotARecord { index: usize, actual: &'static str },

    #[error("test at index {index} has no `name`")]
    MissingName { index: usize },

    #[error("test at index {index} has a {actual} name, expected a string")]
    NameNotString { index: usize, actual: &'static str },

    #[error("test `{name}` has no `run` body")]
    MissingBody { name: String },

    #[error("test `{name}` has a {actual} body, expected a function")]
    BodyNotCallable { name: String, actual: &'static str },

    #[error("test `{name}` body takes {arity} argument(s), expected none")]
    BodyTakesArguments { name: String, arity: usize },

    #[error("duplicate test name `{name}`")]
    DuplicateName { name: String },
}

/// Validates a suite script's value into test cases.
///
/// The value must be a list of records, each with a string `name` and a
/// callable `run` (`body` is accepted as well). A callable that reports an
/// arity must take no arguments. Names must be unique.
pub fn coerce_test_cases(value: HostValue) -> Result<Vec<TestCase>, ShapeError> {
    let items = match value {
        HostValue::List(items) => items,
        other => {
            return Err(ShapeError::NotAList {
                actual: other.type_name(),
            })
        }
    };

    let mut seen = HashSet::new();
    let mut test_cases = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if !matches!(item, HostValue::Record(_)) {
            return Err(ShapeError::NotARecord {
                index,
                actual: item.type_name(),
            });
        }

        let name = match item.field("name") {
            Some(HostValue::Str(name)) => name.clone(),
            Some(other) => {
                return Err(ShapeError::NameNotString {
                    index,
                    actual: other.type_name(),
                })
            }
            None => return Err(ShapeError::MissingName { index }),
        };

        let body = match item.field("run").or_else(|| item.field("body")) {
            Some(HostValue::Callable { id, arity }) => match arity {
                Some(arity) if *arity > 0 => {
                    return Err(ShapeError::BodyTakesArguments {
                        name,
                        arity: *arity,
                    })
                }
                _ => *id,
            },
            Some(other) => {
                return Err(ShapeError::BodyNotCallable {
                    name,
                    actual: other.type_name(),
                })
            }
            None => return Err(ShapeError::MissingBody { name }),
        };

        if !seen.insert(name.clone()) {
            return Err(ShapeError::DuplicateName { name });
        }
        test_cases.push(TestCase { name, body });
    }

    Ok(test_cases)
}

/// Resolves, evaluates and validates one suite.
pub fn load_suite(
    engine: &mut dyn ScriptEngine,
    resolver: &dyn ResourceResolver,
    name: &str,
) -> Result<Suite, SetupError> {
    let source = resolver.resolve(name, engine.extension())?;
    let value = engine.eval(&source).map_err(|source| SetupError::Evaluate {
        suite: name.to_string(),
        source,
    })?;
    let test_cases = coerce_test_cases(value).map_err(|source| SetupError::Shape {
        suite: name.to_string(),
        source,
    })?;
    tracing::debug!(suite = name, tests = test_cases.len(), "loaded suite");
    Ok(Suite {
        name: name.to_string(),
        test_cases,
    })
}

/// Loads suites in order, stopping at the first failure.
pub fn load_suites(
    engine: &mut dyn ScriptEngine,
    resolver: &dyn ResourceResolver,
    names: &[String],
) -> Result<Vec<Suite>, SetupError> {
    let mut suites = Vec::with_capacity(names.len());
    for name in names {
        suites.push(load_suite(engine, resolver, name)?);
    }
    Ok(suites)
}
