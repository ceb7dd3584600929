//! Call-recording test doubles.
//!
//! A stub stands in for a collaborator of the code under test. Scripts record
//! each call made on it and later assert that a given call happened. Both
//! engines share this log; each renders its own argument values to text before
//! recording, so matching compares rendered arguments.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::failure::Failure;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub name: String,
    pub args: Vec<String>,
}

impl StubCall {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for StubCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(","))
    }
}

/// Shared, ordered log of calls. Clones refer to the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<StubCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: StubCall) {
        self.lock().push(call);
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<StubCall> {
        self.lock().clone()
    }

    /// Passes when some recorded call has the expected name and arguments.
    pub fn verify(&self, expected: &StubCall) -> Result<(), Failure> {
        let calls = self.lock();
        if calls.is_empty() {
            return Err(Failure::assertion(format!(
                "No functions called, expected: {}",
                expected
            )));
        }
        if calls.iter().any(|call| call == expected) {
            return Ok(());
        }
        let had = calls
            .iter()
            .map(StubCall::to_string)
            .collect::<Vec<_>>()
            .join("|");
        Err(Failure::assertion(format!(
            "No matching functions called. expected: <{}> but had <{}>",
            expected, had
        )))
    }

    pub fn ptr_eq(&self, other: &CallLog) -> bool {
        Arc::ptr_eq(&self.calls, &other.calls)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StubCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
