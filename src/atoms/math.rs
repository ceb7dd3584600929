//! # Mathematical Operations
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `%`
//!
//! All numbers are `f64`. Division and remainder by zero are errors, not
//! infinities.

use crate::atoms::helpers::{check_arity, check_min_arity, extract_numbers, AtomFn};
use crate::runtime::{Interpreter, Value};
use crate::syntax::ErrorKind;

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///
/// Example:
///   (+ 1 2 3) ; => 6
pub const ATOM_ADD: AtomFn = |interp, args, span| {
    let numbers = extract_numbers(interp, &args, span)?;
    Ok(Value::Number(numbers.into_iter().sum()))
};

/// Subtracts the remaining numbers from the first; negates a single argument.
///
/// Usage: (- <a> <b> ...)
///
/// Example:
///   (- 10 3 2) ; => 5
///   (- 4)      ; => -4
pub const ATOM_SUB: AtomFn = |interp, args, span| {
    check_min_arity(interp, "-", &args, 1, span)?;
    let numbers = extract_numbers(interp, &args, span)?;
    let (first, rest) = (numbers[0], &numbers[1..]);
    if rest.is_empty() {
        return Ok(Value::Number(-first));
    }
    Ok(Value::Number(rest.iter().fold(first, |acc, n| acc - n)))
};

/// Multiplies numbers.
///
/// Usage: (* <a> <b> ...)
pub const ATOM_MUL: AtomFn = |interp, args, span| {
    let numbers = extract_numbers(interp, &args, span)?;
    Ok(Value::Number(numbers.into_iter().product()))
};

/// Divides the first number by each of the rest.
///
/// Usage: (/ <a> <b> ...)
///
/// Example:
///   (/ 12 2 3) ; => 2
pub const ATOM_DIV: AtomFn = |interp, args, span| {
    check_min_arity(interp, "/", &args, 2, span)?;
    let numbers = extract_numbers(interp, &args, span)?;
    let mut result = numbers[0];
    for divisor in &numbers[1..] {
        if *divisor == 0.0 {
            return Err(interp.fault(ErrorKind::DivisionByZero, span));
        }
        result /= divisor;
    }
    Ok(Value::Number(result))
};

/// Remainder of integer-valued or fractional division.
///
/// Usage: (% <a> <b>)
pub const ATOM_MOD: AtomFn = |interp, args, span| {
    check_arity(interp, "%", &args, 2, span)?;
    let numbers = extract_numbers(interp, &args, span)?;
    if numbers[1] == 0.0 {
        return Err(interp.fault(ErrorKind::DivisionByZero, span));
    }
    Ok(Value::Number(numbers[0] % numbers[1]))
};

pub fn register(interpreter: &mut Interpreter) {
    interpreter.register_native("+", ATOM_ADD);
    interpreter.register_native("-", ATOM_SUB);
    interpreter.register_native("*", ATOM_MUL);
    interpreter.register_native("/", ATOM_DIV);
    interpreter.register_native("%", ATOM_MOD);
}
