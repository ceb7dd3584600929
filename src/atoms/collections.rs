//! # Collections
//!
//! - **Construction**: `list`, `map`
//! - **Access**: `get`, `len`
//!
//! Maps are string-keyed records. Suite scripts return a list of them.

use crate::atoms::helpers::{check_arity, extract_number, extract_string, AtomFn};
use crate::runtime::{Interpreter, Value};
use crate::syntax::error::ErrorReporting;

/// Usage: (list <a> <b> ...)
pub const ATOM_LIST: AtomFn = |_interp, args, _span| Ok(Value::List(args));

/// Builds a record from alternating keys and values.
///
/// Usage: (map <key> <value> ...)
///   - <key>: String
///
/// Example:
///   (map "name" "adds" "run" (fn () nil))
pub const ATOM_MAP: AtomFn = |interp, args, span| {
    if args.len() % 2 != 0 {
        return Err(interp.malformed("map with an odd number of arguments", span).into());
    }
    let mut record = im::HashMap::new();
    let mut args = args.into_iter();
    while let (Some(key), Some(value)) = (args.next(), args.next()) {
        let key = extract_string(interp, &key, span)?.to_string();
        record.insert(key, value);
    }
    Ok(Value::Map(record))
};

/// Looks up a map key or a list index. Missing entries are `nil`.
///
/// Usage: (get <collection> <key>)
///
/// Example:
///   (get (map "a" 1) "a") ; => 1
///   (get (list 1 2) 5)    ; => nil
pub const ATOM_GET: AtomFn = |interp, args, span| {
    check_arity(interp, "get", &args, 2, span)?;
    match &args[0] {
        Value::Map(record) => {
            let key = extract_string(interp, &args[1], span)?;
            Ok(record.get(key).cloned().unwrap_or_default())
        }
        Value::List(items) => {
            let index = extract_number(interp, &args[1], span)?;
            if index < 0.0 || index.fract() != 0.0 {
                return Ok(Value::Nil);
            }
            Ok(items.get(index as usize).cloned().unwrap_or_default())
        }
        other => Err(interp.type_mismatch("map or list", other.type_name(), span).into()),
    }
};

/// Usage: (len <list | map | string>)
pub const ATOM_LEN: AtomFn = |interp, args, span| {
    check_arity(interp, "len", &args, 1, span)?;
    let len = match &args[0] {
        Value::List(items) => items.len(),
        Value::Map(record) => record.len(),
        Value::String(s) => s.chars().count(),
        other => {
            return Err(interp
                .type_mismatch("list, map or string", other.type_name(), span)
                .into())
        }
    };
    Ok(Value::Number(len as f64))
};

pub fn register(interpreter: &mut Interpreter) {
    interpreter.register_native("list", ATOM_LIST);
    interpreter.register_native("map", ATOM_MAP);
    interpreter.register_native("get", ATOM_GET);
    interpreter.register_native("len", ATOM_LEN);
}
