//! Adapter exposing the in-house Sutra interpreter as a [`ScriptEngine`].
//!
//! Sutra has no file loading of its own; the selector installs one through
//! [`ScriptEngine::register_loader`]. `(throw v)` leaves the interpreter as
//! [`ScriptError::Interpreted`] holding `v`; every other interpreter error is
//! already a plain host failure.

use std::sync::Arc;

use thiserror::Error;

use super::{CallableId, HostLoader, HostValue, ScriptEngine, ScriptSource};
use crate::atoms::helpers::{check_arity, extract_string};
use crate::failure::{Failure, ScriptError};
use crate::runtime::{EvalError, Interpreter, Value};
use crate::syntax::{ErrorKind, Span};

pub const NAME: &str = "sutra";
pub const EXTENSION: &str = "sutra";

/// A value thrown by a Sutra script.
///
/// The value is opaque to the harness; [`InterpretedWrapper::host_failure`]
/// is the one way to look inside it.
#[derive(Debug, Clone, Error)]
#[error("uncaught script throw: {value}")]
pub struct InterpretedWrapper {
    value: Value,
}

impl InterpretedWrapper {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The thrown script value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The host failure the thrown value refers to, if it refers to one.
    ///
    /// Returns the same `Arc` the script threw, not a copy.
    pub fn host_failure(&self) -> Option<Arc<Failure>> {
        match &self.value {
            Value::Host(object) => object.failure().cloned(),
            _ => None,
        }
    }
}

pub struct SutraEngine {
    interpreter: Interpreter,
    callables: Vec<Value>,
}

impl SutraEngine {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            callables: Vec::new(),
        }
    }

    pub fn boxed() -> Box<dyn ScriptEngine> {
        Box::new(Self::new())
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    fn to_host(&mut self, value: Value) -> HostValue {
        match value {
            Value::Nil => HostValue::Unit,
            Value::Bool(b) => HostValue::Bool(b),
            Value::Number(n) => HostValue::Float(n),
            Value::String(s) => HostValue::Str(s),
            Value::List(items) => {
                HostValue::List(items.into_iter().map(|item| self.to_host(item)).collect())
            }
            Value::Map(record) => {
                let mut fields: Vec<_> = record.into_iter().collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                HostValue::Record(
                    fields
                        .into_iter()
                        .map(|(key, value)| (key, self.to_host(value)))
                        .collect(),
                )
            }
            Value::Lambda(lambda) => {
                let arity = Some(lambda.params.len());
                HostValue::Callable {
                    id: self.store(Value::Lambda(lambda)),
                    arity,
                }
            }
            native @ Value::Native(_) => HostValue::Callable {
                id: self.store(native),
                arity: None,
            },
            Value::Host(object) => HostValue::Opaque(object.to_string()),
        }
    }

    fn store(&mut self, callable: Value) -> CallableId {
        self.callables.push(callable);
        CallableId(self.callables.len() - 1)
    }
}

impl Default for SutraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngine for SutraEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extension(&self) -> &'static str {
        EXTENSION
    }

    fn eval(&mut self, source: &ScriptSource) -> Result<HostValue, ScriptError> {
        self.interpreter.reset_call_stack();
        let value = self
            .interpreter
            .eval_source(&source.name, &source.text)
            .map_err(tag_error)?;
        Ok(self.to_host(value))
    }

    fn invoke(&mut self, callable: CallableId) -> Result<(), ScriptError> {
        let callee = self.callables.get(callable.0).cloned().ok_or_else(|| {
            ScriptError::native(Failure::script(
                NAME,
                format!("no callable with id {}", callable.0),
            ))
        })?;
        self.interpreter.reset_call_stack();
        self.interpreter
            .call(&callee, Vec::new(), Span::default())
            .map(|_| ())
            .map_err(tag_error)
    }

    fn register_loader(&mut self, global: &str, loader: HostLoader) -> bool {
        let name = global.to_string();
        self.interpreter
            .register_native(global, move |interp, args, span| {
                check_arity(interp, &name, &args, 1, span)?;
                let path = extract_string(interp, &args[0], span)?;
                let text = loader(path).map_err(|err| {
                    interp.fault(
                        ErrorKind::Load {
                            path: path.to_string(),
                            reason: err.to_string(),
                        },
                        span,
                    )
                })?;
                interp.eval_source(path, &text)
            });
        true
    }
}

/// Tags an interpreter error at the point it leaves the interpreter.
fn tag_error(error: EvalError) -> ScriptError {
    match error {
        EvalError::Thrown { value, .. } => ScriptError::Interpreted(InterpretedWrapper::new(value)),
        EvalError::Fault(err) => ScriptError::native(Failure::script(NAME, err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::HostObject;

    fn eval(engine: &mut SutraEngine, text: &str) -> Result<HostValue, ScriptError> {
        engine.eval(&ScriptSource::new("test.sutra", text))
    }

    #[test]
    fn records_come_back_with_sorted_fields() {
        let mut engine = SutraEngine::new();
        let value = eval(&mut engine, "(map \"run\" (fn () nil) \"name\" \"t\")").unwrap();
        let HostValue::Record(fields) = &value else {
            panic!("expected a record, got {:?}", value);
        };
        assert_eq!(fields[0].0, "name");
        assert_eq!(fields[1].0, "run");
        assert!(matches!(
            value.field("run"),
            Some(HostValue::Callable { arity: Some(0), .. })
        ));
    }

    #[test]
    fn invoke_runs_the_stored_lambda() {
        let mut engine = SutraEngine::new();
        let value = eval(&mut engine, "(fn () (throw (assertion-failure \"boom\")))").unwrap();
        let HostValue::Callable { id, .. } = value else {
            panic!("expected a callable");
        };
        let Err(ScriptError::Interpreted(wrapper)) = engine.invoke(id) else {
            panic!("expected an interpreted throw");
        };
        assert_eq!(*wrapper.host_failure().unwrap(), Failure::assertion("boom"));
    }

    #[test]
    fn host_failure_is_the_thrown_arc() {
        let failure = Arc::new(Failure::assertion("same"));
        let wrapper = InterpretedWrapper::new(Value::Host(HostObject::Failure(failure.clone())));
        assert!(Arc::ptr_eq(&wrapper.host_failure().unwrap(), &failure));
        assert!(InterpretedWrapper::new(Value::from("text")).host_failure().is_none());
    }

    #[test]
    fn interpreter_faults_become_plain_failures() {
        let mut engine = SutraEngine::new();
        let Err(ScriptError::Native(failure)) = eval(&mut engine, "(+ 1 undefined-name)") else {
            panic!("expected a native failure");
        };
        assert!(matches!(&*failure, Failure::Script { engine: "sutra", .. }));
        assert!(failure.to_string().contains("undefined symbol `undefined-name`"));
    }

    #[test]
    fn registered_loader_evaluates_into_globals() {
        let mut engine = SutraEngine::new();
        let loader: HostLoader = Arc::new(|path: &str| match path {
            "lib.sutra" => Ok("(define (double x) (* 2 x))".to_string()),
            _ => Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
        });
        assert!(engine.register_loader("host/load", loader));
        let value = eval(&mut engine, "(host/load \"lib.sutra\") (double 21)").unwrap();
        assert_eq!(value, HostValue::Float(42.0));

        let Err(ScriptError::Native(failure)) = eval(&mut engine, "(host/load \"nope.sutra\")")
        else {
            panic!("expected a load failure");
        };
        assert!(failure.to_string().contains("could not load `nope.sutra`"));
    }

    #[test]
    fn panicking_body_does_not_shrink_the_next_budget() {
        let mut engine = SutraEngine::new();
        engine.interpreter = Interpreter::new().with_max_depth(12);
        engine
            .interpreter
            .register_native("boom", |_, _, _| panic!("native blew up"));
        eval(
            &mut engine,
            "(define (sink n) (if (= n 0) (boom) (sink (- n 1))))
             (define (count n) (if (= n 0) 0 (count (- n 1))))",
        )
        .unwrap();
        let Ok(HostValue::Callable { id: panics, .. }) = eval(&mut engine, "(fn () (sink 10))")
        else {
            panic!("expected a callable");
        };
        let Ok(HostValue::Callable { id: deep, .. }) = eval(&mut engine, "(fn () (count 10))")
        else {
            panic!("expected a callable");
        };

        let unwound =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| engine.invoke(panics)));
        assert!(unwound.is_err());
        assert!(engine.interpreter().depth() > 0);

        engine.invoke(deep).unwrap();
        assert_eq!(engine.interpreter().depth(), 0);
    }
}
