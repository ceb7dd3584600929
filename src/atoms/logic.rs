//! # Logic and Comparison
//!
//! - **Comparison**: `=`, `<`, `>`, `<=`, `>=`
//! - **Logic**: `not`
//!
//! `and`/`or` short-circuit, so they are special forms in the evaluator.

use crate::atoms::helpers::{check_arity, check_min_arity, extract_numbers, AtomFn, AtomResult};
use crate::runtime::{Interpreter, Value};
use crate::syntax::Span;

/// True when every argument equals the first.
///
/// Usage: (= <a> <b> ...)
///
/// Example:
///   (= 2 (+ 1 1)) ; => true
///   (= "a" "b")   ; => false
pub const ATOM_EQ: AtomFn = |interp, args, span| {
    check_min_arity(interp, "=", &args, 2, span)?;
    let first = &args[0];
    Ok(Value::Bool(args[1..].iter().all(|arg| arg == first)))
};

pub const ATOM_LT: AtomFn = |interp, args, span| compare(interp, "<", args, span, |a, b| a < b);
pub const ATOM_GT: AtomFn = |interp, args, span| compare(interp, ">", args, span, |a, b| a > b);
pub const ATOM_LTE: AtomFn = |interp, args, span| compare(interp, "<=", args, span, |a, b| a <= b);
pub const ATOM_GTE: AtomFn = |interp, args, span| compare(interp, ">=", args, span, |a, b| a >= b);

/// Logical negation by truthiness.
///
/// Usage: (not <value>)
pub const ATOM_NOT: AtomFn = |interp, args, span| {
    check_arity(interp, "not", &args, 1, span)?;
    Ok(Value::Bool(!args[0].is_truthy()))
};

/// Chained numeric comparison: `(< 1 2 3)` holds when every adjacent pair does.
fn compare(
    interp: &mut Interpreter,
    name: &str,
    args: Vec<Value>,
    span: Span,
    op: fn(f64, f64) -> bool,
) -> AtomResult {
    check_min_arity(interp, name, &args, 2, span)?;
    let numbers = extract_numbers(interp, &args, span)?;
    Ok(Value::Bool(numbers.windows(2).all(|pair| op(pair[0], pair[1]))))
}

pub fn register(interpreter: &mut Interpreter) {
    interpreter.register_native("=", ATOM_EQ);
    interpreter.register_native("<", ATOM_LT);
    interpreter.register_native(">", ATOM_GT);
    interpreter.register_native("<=", ATOM_LTE);
    interpreter.register_native(">=", ATOM_GTE);
    interpreter.register_native("not", ATOM_NOT);
}
