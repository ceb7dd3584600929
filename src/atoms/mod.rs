//! # Sutra Atom System
//!
//! Atoms are the native functions every interpreter starts with. Special
//! forms (`define`, `if`, `lambda`, ...) live in the evaluator instead,
//! because they control evaluation of their arguments.
//!
//! ## Module Structure
//!
//! - **`helpers`**: arity checks and typed extraction
//! - **`math`**: `+`, `-`, `*`, `/`, `%`
//! - **`logic`**: `=`, `<`, `>`, `<=`, `>=`, `not`
//! - **`collections`**: `list`, `map`, `get`, `len`
//! - **`external`**: `str`, `print`, `type-of`
//! - **`test`**: `throw`, `assertion-failure`, `comparison-failure`

use crate::runtime::Interpreter;

pub mod collections;
pub mod external;
pub mod helpers;
pub mod logic;
pub mod math;

pub use helpers::{AtomFn, AtomResult};

/// Installs every standard atom as a global of `interpreter`.
pub fn register_std_atoms(interpreter: &mut Interpreter) {
    math::register(interpreter);
    logic::register(interpreter);
    collections::register(interpreter);
    external::register(interpreter);
    test::register(interpreter);
}
