//! Choosing the engine for a run.
//!
//! The preferred engine is used whenever it is compiled in. The fallback
//! cannot read files by itself, so selecting it installs a host loader as
//! `host/load` plus a script-level `load` wrapper, giving both engines a way
//! to pull in other scripts.

use tracing::info;

use super::{HostLoader, ScriptEngine, ScriptSource};
use crate::errors::SetupError;

pub const PREFERRED_ENGINE: &str = "rhai";
pub const FALLBACK_ENGINE: &str = "sutra";

/// Global under which the fallback engine sees the host loader.
pub const LOADER_GLOBAL: &str = "host/load";

/// Script-level `load`, evaluated once into the fallback engine.
pub const LOAD_SHIM: &str = "(define (load path) (host/load path))";

/// Picks the preferred engine, else the bootstrapped fallback.
pub fn select_engine(
    registry: &super::EngineRegistry,
    loader: HostLoader,
) -> Result<Box<dyn ScriptEngine>, SetupError> {
    if let Some(engine) = registry.get_engine_by_name(PREFERRED_ENGINE) {
        info!(engine = PREFERRED_ENGINE, "selected script engine");
        return Ok(engine);
    }

    if let Some(engine) = registry.get_engine_by_name(FALLBACK_ENGINE) {
        let engine = bootstrap(engine, loader)?;
        info!(engine = FALLBACK_ENGINE, "selected fallback script engine");
        return Ok(engine);
    }

    Err(SetupError::NoEngine {
        tried: vec![PREFERRED_ENGINE, FALLBACK_ENGINE],
    })
}

/// Uses exactly the named engine, bootstrapping it if it is the fallback.
pub fn select_named(
    registry: &super::EngineRegistry,
    name: &str,
    loader: HostLoader,
) -> Result<Box<dyn ScriptEngine>, SetupError> {
    let engine = registry
        .get_engine_by_name(name)
        .ok_or_else(|| SetupError::UnknownEngine {
            name: name.to_string(),
            available: registry.names().join(", "),
        })?;
    let engine = if name == FALLBACK_ENGINE {
        bootstrap(engine, loader)?
    } else {
        engine
    };
    info!(engine = name, "selected script engine by name");
    Ok(engine)
}

fn bootstrap(
    mut engine: Box<dyn ScriptEngine>,
    loader: HostLoader,
) -> Result<Box<dyn ScriptEngine>, SetupError> {
    let name = engine.name();
    if !engine.register_loader(LOADER_GLOBAL, loader) {
        return Err(SetupError::LoaderUnsupported { engine: name });
    }
    engine
        .eval(&ScriptSource::new("<bootstrap>", LOAD_SHIM))
        .map_err(|source| SetupError::Bootstrap {
            engine: name,
            source,
        })?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::sutra::SutraEngine;
    use crate::engine::{EngineRegistry, HostValue};

    fn no_files() -> HostLoader {
        Arc::new(|path: &str| Ok(format!("(define loaded \"{}\")", path)))
    }

    #[test]
    fn empty_registry_is_fatal() {
        let err = select_engine(&EngineRegistry::empty(), no_files()).unwrap_err();
        assert!(matches!(err, SetupError::NoEngine { ref tried } if tried == &["rhai", "sutra"]));
    }

    #[test]
    fn fallback_gets_a_load_function() {
        let mut registry = EngineRegistry::empty();
        registry.register(FALLBACK_ENGINE, SutraEngine::boxed);
        let mut engine = select_engine(&registry, no_files()).unwrap();
        assert_eq!(engine.name(), "sutra");

        let value = engine
            .eval(&ScriptSource::new("t.sutra", "(load \"lib.sutra\") loaded"))
            .unwrap();
        assert_eq!(value, HostValue::Str("lib.sutra".into()));
    }

    #[cfg(feature = "rhai")]
    #[test]
    fn preferred_engine_wins() {
        let engine = select_engine(&EngineRegistry::with_defaults(), no_files()).unwrap();
        assert_eq!(engine.name(), "rhai");
    }

    #[test]
    fn named_selection() {
        let registry = EngineRegistry::with_defaults();
        let engine = select_named(&registry, "sutra", no_files()).unwrap();
        assert_eq!(engine.name(), "sutra");

        let err = select_named(&registry, "lua", no_files()).unwrap_err();
        assert!(matches!(err, SetupError::UnknownEngine { ref name, .. } if name == "lua"));
    }
}
