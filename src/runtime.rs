//! The Sutra interpreter.
//!
//! A small tree-walking evaluator over [`crate::syntax`] nodes. It is the
//! fallback engine: everything test scripts need (closures, records, a
//! `throw` that carries host failures) and nothing else. It has no file
//! loading of its own; hosts install one with [`Interpreter::define_global`].

use std::collections::HashMap;

use thiserror::Error;

use crate::atoms;
use crate::syntax::error::ErrorReporting;
use crate::syntax::{parser, ErrorKind, SourceContext, Span, SutraError};

pub mod eval;
pub mod value;

pub use value::{Env, HostObject, Lambda, NativeFn, Value};

const DEFAULT_MAX_DEPTH: usize = 256;

/// Why evaluation stopped.
#[derive(Debug, Error)]
pub enum EvalError {
    /// `(throw value)` unwound to the host.
    #[error("uncaught throw: {value}")]
    Thrown { value: Value, span: Span },

    #[error(transparent)]
    Fault(Box<SutraError>),
}

impl From<SutraError> for EvalError {
    fn from(error: SutraError) -> Self {
        EvalError::Fault(Box::new(error))
    }
}

/// Evaluation state: global bindings plus the source currently executing.
pub struct Interpreter {
    globals: HashMap<String, Value>,
    source: SourceContext,
    depth: usize,
    max_depth: usize,
}

impl Interpreter {
    /// Interpreter with the standard atoms installed.
    pub fn new() -> Self {
        let mut interpreter = Self::bare();
        atoms::register_std_atoms(&mut interpreter);
        interpreter
    }

    /// Interpreter with no globals at all.
    pub fn bare() -> Self {
        Self {
            globals: HashMap::new(),
            source: SourceContext::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn register_native<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&mut Interpreter, Vec<Value>, Span) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.define_global(name, Value::Native(NativeFn::new(name, func)));
    }

    /// Parses and evaluates a whole script, returning the value of its last form.
    pub fn eval_source(&mut self, name: &str, text: &str) -> Result<Value, EvalError> {
        let source = SourceContext::from_file(name, text);
        let nodes = parser::parse(&source)?;
        let previous = std::mem::replace(&mut self.source, source);
        let result = self.eval_body(&nodes, &Env::new());
        self.source = previous;
        result
    }

    /// Current lambda nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Drops frame state left behind by a call that unwound without returning.
    pub fn reset_call_stack(&mut self) {
        self.depth = 0;
        self.source = SourceContext::default();
    }

    /// Source of the code currently executing.
    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    pub(crate) fn fault(&self, kind: ErrorKind, span: Span) -> EvalError {
        self.report(kind, span).into()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporting for Interpreter {
    fn report(&self, kind: ErrorKind, span: Span) -> SutraError {
        self.source.report(kind, span)
    }
}
