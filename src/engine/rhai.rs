//! The preferred engine: [Rhai](https://rhai.rs).
//!
//! Script functions defined by any evaluated script are kept in one
//! functions-only AST (`lib`), so closures returned by a suite can call the
//! shared utilities when they run later. Rhai loads files natively with
//! `import`, resolved against the suite root.
//!
//! Besides the failure constructors, the engine provides call-recording
//! stubs (`new_stub`), a `console::log` module and the `tests { name: body }`
//! suite literal, which keeps tests in the order they are written.

use std::path::Path;
use std::sync::Arc;

use rhai::module_resolvers::FileModuleResolver;
use rhai::{
    Array, Dynamic, Engine, EvalAltResult, EvalContext, Expression, FnPtr, ImmutableString, Map,
    Module, ParseError, Position, Scope, AST, INT,
};

use super::{CallableId, HostValue, ScriptEngine, ScriptSource};
use crate::failure::{CompiledWrapper, Failure, ScriptError};
use crate::stub::{CallLog, StubCall};

pub const NAME: &str = "rhai";
pub const EXTENSION: &str = "rhai";

/// A host failure as scripts see it (`Failure` in Rhai).
#[derive(Debug, Clone)]
pub struct HostFailure(pub Arc<Failure>);

impl HostFailure {
    fn new(failure: Failure) -> Self {
        Self(Arc::new(failure))
    }
}

/// A call-recording stub as scripts see it (`Stub` in Rhai).
#[derive(Debug, Clone, Default)]
pub struct RhaiStub(pub CallLog);

impl RhaiStub {
    fn record(&mut self, name: &str, args: Array) {
        self.0.record(StubCall::new(name, render_args(&args)));
    }

    fn assert_called(&mut self, name: &str, args: Array) -> Result<(), Box<EvalAltResult>> {
        self.0
            .verify(&StubCall::new(name, render_args(&args)))
            .map_err(|failure| {
                EvalAltResult::ErrorRuntime(
                    Dynamic::from(HostFailure::new(failure)),
                    Position::NONE,
                )
                .into()
            })
    }

    fn calls(&mut self) -> Array {
        self.0
            .calls()
            .iter()
            .map(|call| Dynamic::from(call.to_string()))
            .collect()
    }
}

fn render_args(args: &Array) -> Vec<String> {
    args.iter().map(Dynamic::to_string).collect()
}

pub struct RhaiEngine {
    engine: Engine,
    scope: Scope<'static>,
    lib: AST,
    callables: Vec<FnPtr>,
}

impl RhaiEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();

        engine
            .register_type_with_name::<HostFailure>("Failure")
            .register_get("message", |failure: &mut HostFailure| failure.0.to_string())
            .register_fn("to_string", |failure: &mut HostFailure| {
                format!("{}: {}", failure.0.kind(), failure.0)
            })
            .register_fn("assertion_failure", |message: &str| {
                HostFailure::new(Failure::assertion(message))
            })
            .register_fn(
                "comparison_failure",
                |message: &str, expected: Dynamic, actual: Dynamic| {
                    HostFailure::new(Failure::comparison(
                        message,
                        expected.to_string(),
                        actual.to_string(),
                    ))
                },
            );

        engine
            .register_type_with_name::<RhaiStub>("Stub")
            .register_fn("new_stub", RhaiStub::default)
            .register_fn("record", |stub: &mut RhaiStub, name: &str| {
                stub.record(name, Array::new())
            })
            .register_fn("record", RhaiStub::record)
            .register_fn("assert_called", RhaiStub::assert_called)
            .register_get("calls", RhaiStub::calls);

        engine.on_print(|text| tracing::info!(target: "scriptunit::script", "{}", text));

        let mut console = Module::new();
        console.set_native_fn("log", |value: Dynamic| {
            tracing::info!(target: "scriptunit::script", "{}", value);
            Ok::<_, Box<EvalAltResult>>(())
        });
        engine.register_static_module("console", console.into());

        engine.register_custom_syntax_with_state_raw(
            "tests",
            parse_tests_literal,
            false,
            eval_tests_literal,
        );

        Self {
            engine,
            scope: Scope::new(),
            lib: AST::empty(),
            callables: Vec::new(),
        }
    }

    pub fn boxed() -> Box<dyn ScriptEngine> {
        Box::new(Self::new())
    }

    fn to_host(&mut self, value: Dynamic) -> HostValue {
        let value = value.flatten();
        if value.is_unit() {
            return HostValue::Unit;
        }
        if let Ok(b) = value.as_bool() {
            return HostValue::Bool(b);
        }
        if let Ok(i) = value.as_int() {
            return HostValue::Int(i);
        }
        if let Ok(f) = value.as_float() {
            return HostValue::Float(f);
        }
        if value.is_string() {
            return HostValue::Str(value.to_string());
        }
        let type_name = value.type_name().to_string();
        if let Some(items) = value.clone().try_cast::<Array>() {
            return HostValue::List(items.into_iter().map(|item| self.to_host(item)).collect());
        }
        if let Some(map) = value.clone().try_cast::<Map>() {
            return HostValue::Record(
                map.into_iter()
                    .map(|(key, value)| (key.to_string(), self.to_host(value)))
                    .collect(),
            );
        }
        if let Some(fn_ptr) = value.try_cast::<FnPtr>() {
            let arity = self.arity_of(&fn_ptr);
            self.callables.push(fn_ptr);
            return HostValue::Callable {
                id: CallableId(self.callables.len() - 1),
                arity,
            };
        }
        HostValue::Opaque(type_name)
    }

    /// Declared parameters minus curried captures, for script-defined functions.
    fn arity_of(&self, fn_ptr: &FnPtr) -> Option<usize> {
        self.lib
            .iter_functions()
            .find(|function| function.name == fn_ptr.fn_name())
            .map(|function| function.params.len().saturating_sub(fn_ptr.curry().len()))
    }

    fn tag_error(&self, error: Box<EvalAltResult>) -> ScriptError {
        let cause = host_failure_in(&error);
        ScriptError::Compiled(CompiledWrapper::new(NAME, error.to_string(), cause))
    }
}

impl Default for RhaiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngine for RhaiEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extension(&self) -> &'static str {
        EXTENSION
    }

    fn eval(&mut self, source: &ScriptSource) -> Result<HostValue, ScriptError> {
        let mut ast = self.engine.compile(&source.text).map_err(|err| {
            ScriptError::native(Failure::script(NAME, format!("{}: {}", source.name, err)))
        })?;
        ast.set_source(source.name.as_str());

        let program = self.lib.merge(&ast);
        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &program)
            .map_err(|err| self.tag_error(err))?;

        self.lib = self.lib.merge(&ast.clone_functions_only());
        Ok(self.to_host(result))
    }

    fn invoke(&mut self, callable: CallableId) -> Result<(), ScriptError> {
        let fn_ptr = self.callables.get(callable.0).cloned().ok_or_else(|| {
            ScriptError::native(Failure::script(
                NAME,
                format!("no callable with id {}", callable.0),
            ))
        })?;
        fn_ptr
            .call::<Dynamic>(&self.engine, &self.lib, ())
            .map(|_| ())
            .map_err(|err| self.tag_error(err))
    }

    fn set_search_root(&mut self, root: &Path) {
        self.engine
            .set_module_resolver(FileModuleResolver::new_with_path(root));
    }
}

/// Drives the parser through `tests { name: body, ... }`, one token at a time.
///
/// `state` holds the position: 0 before `{`, 1 before a name (or the closing
/// brace), 2 before `:`, 3 before a body, 4 after a body, 5 done.
fn parse_tests_literal(
    _symbols: &[ImmutableString],
    look_ahead: &str,
    state: &mut Dynamic,
) -> Result<Option<ImmutableString>, ParseError> {
    let (next, phase): (&str, INT) = match state.as_int().unwrap_or(0) {
        0 => ("{", 1),
        1 if look_ahead == "}" => ("}", 5),
        1 => ("$ident$", 2),
        2 => (":", 3),
        3 => ("$expr$", 4),
        4 if look_ahead == "," => (",", 1),
        4 => ("}", 5),
        _ => return Ok(None),
    };
    *state = Dynamic::from(phase);
    Ok(Some(next.into()))
}

/// Evaluates a parsed `tests { ... }` into test records, in source order.
fn eval_tests_literal(
    context: &mut EvalContext,
    inputs: &[Expression],
    _state: &Dynamic,
) -> Result<Dynamic, Box<EvalAltResult>> {
    let mut cases = Array::with_capacity(inputs.len() / 2);
    for pair in inputs.chunks_exact(2) {
        let name = pair[0]
            .get_string_value()
            .ok_or("a test name in `tests { ... }` must be an identifier")?
            .to_string();
        let body = context.eval_expression_tree(&pair[1])?;
        let mut case = Map::new();
        case.insert("name".into(), name.into());
        case.insert("run".into(), body);
        cases.push(case.into());
    }
    Ok(cases.into())
}

/// Finds a thrown `Failure` under any layers of call and module wrapping.
fn host_failure_in(error: &EvalAltResult) -> Option<Arc<Failure>> {
    match error {
        EvalAltResult::ErrorRuntime(value, _) => value
            .clone()
            .flatten()
            .try_cast::<HostFailure>()
            .map(|failure| failure.0),
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => host_failure_in(inner),
        EvalAltResult::ErrorInModule(_, inner, _) => host_failure_in(inner),
        _ => None,
    }
}
