//! Reduces whatever a test body threw to the host failure worth reporting.

use std::sync::Arc;

use crate::engine::sutra;
use crate::errors::NormalizeError;
use crate::failure::{Failure, ScriptError};

/// Recovers the original failure from an engine error.
///
/// - `Native`: returned unchanged.
/// - `Compiled`: the thrown failure when there is one, else the wrapper's own.
/// - `Interpreted`: the host failure the thrown value refers to, pointer
///   identical. A thrown value without one is a fatal [`NormalizeError`].
pub fn normalize(error: ScriptError) -> Result<Arc<Failure>, NormalizeError> {
    match error {
        ScriptError::Native(failure) => Ok(failure),
        ScriptError::Compiled(wrapper) => Ok(wrapper
            .cause()
            .cloned()
            .unwrap_or_else(|| wrapper.failure().clone())),
        ScriptError::Interpreted(wrapper) => {
            wrapper
                .host_failure()
                .ok_or_else(|| NormalizeError::Unwrap {
                    engine: sutra::NAME,
                    value: wrapper.value().to_string(),
                })
        }
    }
}
