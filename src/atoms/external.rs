//! # External Interface
//!
//! `print` and `console.log` write through `tracing` (target
//! `scriptunit::script`) so script output shows up alongside the harness's
//! own logs.

use crate::atoms::helpers::{check_arity, AtomFn};
use crate::runtime::{Interpreter, Value};

/// Concatenates the display form of every argument.
///
/// Usage: (str <a> <b> ...)
///
/// Example:
///   (str "n=" 3) ; => "n=3"
pub const ATOM_STR: AtomFn = |_interp, args, _span| {
    Ok(Value::String(args.iter().map(Value::to_string).collect()))
};

/// Usage: (print <value> ...)
///
///   Returns: Nil.
pub const ATOM_PRINT: AtomFn = |_interp, args, _span| {
    let line = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(target: "scriptunit::script", "{}", line);
    Ok(Value::Nil)
};

/// Usage: (type-of <value>)
pub const ATOM_TYPE_OF: AtomFn = |interp, args, span| {
    check_arity(interp, "type-of", &args, 1, span)?;
    Ok(Value::from(args[0].type_name()))
};

pub fn register(interpreter: &mut Interpreter) {
    interpreter.register_native("str", ATOM_STR);
    interpreter.register_native("print", ATOM_PRINT);
    interpreter.register_native("console.log", ATOM_PRINT);
    interpreter.register_native("type-of", ATOM_TYPE_OF);
}
