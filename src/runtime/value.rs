use std::fmt;
use std::sync::Arc;

use im::HashMap;

use super::{EvalError, Interpreter};
use crate::failure::Failure;
use crate::stub::CallLog;
use crate::syntax::{AstNode, SourceContext, Span};

/// Integral numbers below this magnitude print without a fractional part.
const MAX_EXACT_INTEGER: f64 = 9.0e15;

/// Lexical environment captured by lambdas. Persistent, so capture is a cheap clone.
pub type Env = HashMap<String, Value>;

/// Signature shared by every native function.
pub type NativeImpl =
    dyn Fn(&mut Interpreter, Vec<Value>, Span) -> Result<Value, EvalError> + Send + Sync;

/// Represents a value in the Sutra engine.
///
/// # Examples
///
/// ```rust
/// use scriptunit::runtime::Value;
/// let n = Value::Number(3.0);
/// assert_eq!(n.type_name(), "number");
/// assert_eq!(n.to_string(), "3");
/// assert!(!Value::Nil.is_truthy());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    Lambda(Arc<Lambda>),
    Native(NativeFn),
    Host(HostObject),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Lambda(_) => "lambda",
            Value::Native(_) => "native",
            Value::Host(object) => object.type_name(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Lambda(_) | Value::Native(_))
    }

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &HashMap<String, Value>) -> fmt::Result {
        let mut keys: Vec<_> = map.keys().collect();
        keys.sort();
        write!(f, "{{")?;
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, map[key])?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => Value::fmt_list(f, items),
            Value::Map(map) => Value::fmt_map(f, map),
            Value::Lambda(lambda) => match &lambda.name {
                Some(name) => write!(f, "<lambda {}>", name),
                None => write!(f, "<lambda>"),
            },
            Value::Native(native) => write!(f, "<native {}>", native.name),
            Value::Host(object) => write!(f, "{}", object),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Value::Host(a), Value::Host(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A user-defined function with its captured environment.
#[derive(Debug)]
pub struct Lambda {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<AstNode>,
    pub env: Env,
    pub source: SourceContext,
}

/// A function implemented in Rust.
#[derive(Clone)]
pub struct NativeFn {
    pub name: Arc<str>,
    func: Arc<NativeImpl>,
}

impl NativeFn {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut Interpreter, Vec<Value>, Span) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, EvalError> {
        (self.func)(interpreter, args, span)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish()
    }
}

/// A host object held by a script value.
#[derive(Debug, Clone)]
pub enum HostObject {
    Failure(Arc<Failure>),
    Stub(CallLog),
}

impl HostObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            HostObject::Failure(_) => "failure",
            HostObject::Stub(_) => "stub",
        }
    }

    /// The host failure this object refers to, if it is one.
    pub fn failure(&self) -> Option<&Arc<Failure>> {
        match self {
            HostObject::Failure(failure) => Some(failure),
            HostObject::Stub(_) => None,
        }
    }

    pub fn stub(&self) -> Option<&CallLog> {
        match self {
            HostObject::Stub(log) => Some(log),
            HostObject::Failure(_) => None,
        }
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostObject::Failure(a), HostObject::Failure(b)) => Arc::ptr_eq(a, b),
            (HostObject::Stub(a), HostObject::Stub(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostObject::Failure(failure) => write!(f, "<{}: {}>", failure.kind(), failure),
            HostObject::Stub(log) => write!(f, "<stub: {} calls>", log.calls().len()),
        }
    }
}
