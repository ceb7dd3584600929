//! The shared test utilities, compiled into the binary.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::engine::{ScriptEngine, ScriptSource};
use crate::errors::SetupError;

static BUNDLED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rhai", include_str!("scripts/test_utils.rhai")),
        ("sutra", include_str!("scripts/test_utils.sutra")),
    ])
});

/// Utility script text for the named engine, if one is bundled.
pub fn bundled_utilities(engine: &str) -> Option<&'static str> {
    BUNDLED.get(engine).copied()
}

/// Evaluates the engine's utility script into its global scope.
///
/// Must run once, before any suite is loaded.
pub fn load_utilities(engine: &mut dyn ScriptEngine) -> Result<(), SetupError> {
    let name = engine.name();
    let text = bundled_utilities(name).ok_or(SetupError::MissingUtilities { engine: name })?;
    let source = ScriptSource::new(format!("test_utils.{}", engine.extension()), text);
    engine
        .eval(&source)
        .map_err(|source| SetupError::Utilities {
            engine: name,
            source,
        })?;
    tracing::debug!(engine = name, "loaded test utilities");
    Ok(())
}
