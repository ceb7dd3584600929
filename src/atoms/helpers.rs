//! # Atom Helper Infrastructure
//!
//! Argument checks and typed extraction shared by every atom.

use crate::runtime::{EvalError, Interpreter, Value};
use crate::syntax::error::ErrorReporting;
use crate::syntax::Span;

/// Return type of every atom.
pub type AtomResult = Result<Value, EvalError>;

/// Signature of every atom; a plain fn pointer, so it is `Send + Sync`.
pub type AtomFn = fn(&mut Interpreter, Vec<Value>, Span) -> AtomResult;

pub fn check_arity(
    interpreter: &Interpreter,
    name: &str,
    args: &[Value],
    expected: usize,
    span: Span,
) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(interpreter
            .arity_mismatch(name, &expected.to_string(), args.len(), span)
            .into());
    }
    Ok(())
}

pub fn check_min_arity(
    interpreter: &Interpreter,
    name: &str,
    args: &[Value],
    min: usize,
    span: Span,
) -> Result<(), EvalError> {
    if args.len() < min {
        return Err(interpreter
            .arity_mismatch(name, &format!("at least {}", min), args.len(), span)
            .into());
    }
    Ok(())
}

pub fn extract_number(interpreter: &Interpreter, value: &Value, span: Span) -> Result<f64, EvalError> {
    value
        .as_number()
        .ok_or_else(|| interpreter.type_mismatch("number", value.type_name(), span).into())
}

pub fn extract_string<'a>(
    interpreter: &Interpreter,
    value: &'a Value,
    span: Span,
) -> Result<&'a str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| interpreter.type_mismatch("string", value.type_name(), span).into())
}

/// Extracts every argument as a number.
pub fn extract_numbers(
    interpreter: &Interpreter,
    args: &[Value],
    span: Span,
) -> Result<Vec<f64>, EvalError> {
    args.iter()
        .map(|arg| extract_number(interpreter, arg, span))
        .collect()
}
