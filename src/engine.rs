//! Script engines behind one small interface.
//!
//! The harness never touches an engine's own value or error types. Engines
//! convert what scripts return into [`HostValue`] and tag what scripts throw
//! as a [`ScriptError`], so everything downstream is engine-neutral.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::failure::ScriptError;

pub mod registry;
#[cfg(feature = "rhai")]
pub mod rhai;
pub mod selector;
pub mod sutra;

pub use registry::EngineRegistry;
pub use selector::{select_engine, select_named};

/// Engine-owned handle to a callable returned by a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallableId(pub usize);

/// Engine-neutral view of a script value.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<HostValue>),
    /// Fields in the order the engine reports them.
    Record(Vec<(String, HostValue)>),
    /// `arity` is `None` when the engine cannot tell.
    Callable {
        id: CallableId,
        arity: Option<usize>,
    },
    /// Anything else, described by its engine type name.
    Opaque(String),
}

impl HostValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Unit => "unit",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "string",
            HostValue::List(_) => "list",
            HostValue::Record(_) => "record",
            HostValue::Callable { .. } => "callable",
            HostValue::Opaque(_) => "opaque",
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&HostValue> {
        match self {
            HostValue::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// A named piece of script text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    pub name: String,
    pub text: String,
}

impl ScriptSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Host-side file reading handed to engines that cannot load files themselves.
pub type HostLoader = Arc<dyn Fn(&str) -> io::Result<String> + Send + Sync>;

/// A loader that reads paths relative to `base`.
pub fn file_loader(base: impl Into<PathBuf>) -> HostLoader {
    let base = base.into();
    Arc::new(move |path: &str| std::fs::read_to_string(base.join(path)))
}

/// An embedded script runtime.
///
/// One engine instance lives for one discovery + execution run. Globals
/// defined by one `eval` are visible to every later `eval` and `invoke`.
pub trait ScriptEngine {
    /// Registry name, e.g. `"rhai"`.
    fn name(&self) -> &'static str;

    /// File extension of scripts in this engine's dialect, without the dot.
    fn extension(&self) -> &'static str;

    /// Evaluates a script into the engine's global scope and returns its value.
    fn eval(&mut self, source: &ScriptSource) -> Result<HostValue, ScriptError>;

    /// Calls a zero-argument callable previously returned by [`ScriptEngine::eval`].
    fn invoke(&mut self, callable: CallableId) -> Result<(), ScriptError>;

    /// Installs `loader` as a script-visible function named `global`.
    ///
    /// Returns `false` when the engine has no way to expose host functions.
    fn register_loader(&mut self, _global: &str, _loader: HostLoader) -> bool {
        false
    }

    /// Directory that script-level imports resolve against.
    fn set_search_root(&mut self, _root: &Path) {}
}

impl fmt::Debug for dyn ScriptEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("name", &self.name())
            .finish()
    }
}
