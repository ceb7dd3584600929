//! Diagnostics for the Sutra interpreter.
//!
//! Every parse or evaluation error carries the source it came from and the
//! span of the offending expression, so miette can render it in place.

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::Span;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Name and text of a script, shared by every node and lambda built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub name: Arc<str>,
    pub content: Arc<str>,
}

impl SourceContext {
    pub fn from_file(name: impl AsRef<str>, content: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            content: Arc::from(content.as_ref()),
        }
    }

    /// Create a fallback when real source is unavailable
    pub fn fallback(context: &str) -> Self {
        Self::from_file("fallback", format!("; {}", context))
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.to_string(), self.content.to_string())
    }

    /// One-based line and column of a byte offset.
    pub fn location(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let prefix = self.content.get(..offset).unwrap_or_default();
        let line = prefix.matches('\n').count() + 1;
        let column = prefix.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
        (line, column)
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// All error types as a clean enum - no duplicate fields
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Parse errors
    #[error("syntax error: {message}")]
    Syntax { message: String },
    #[error("invalid {literal_type} literal `{value}`")]
    InvalidLiteral { literal_type: String, value: String },
    #[error("malformed {construct}")]
    MalformedConstruct { construct: String },

    // Runtime errors
    #[error("undefined symbol `{symbol}`")]
    UndefinedSymbol { symbol: String },
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("`{callee}` expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        callee: String,
        expected: String,
        actual: usize,
    },
    #[error("cannot call a value of type {actual}")]
    NotCallable { actual: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("recursion limit exceeded")]
    RecursionLimit,
    #[error("could not load `{path}`: {reason}")]
    Load { path: String, reason: String },
}

impl ErrorKind {
    pub fn code_suffix(&self) -> &'static str {
        match self {
            ErrorKind::Syntax { .. }
            | ErrorKind::InvalidLiteral { .. }
            | ErrorKind::MalformedConstruct { .. } => "parse",
            ErrorKind::Load { .. } => "load",
            _ => "eval",
        }
    }
}

/// A located interpreter error.
#[derive(Debug, Error, Diagnostic)]
#[error("{kind} ({origin}:{line}:{column})")]
#[diagnostic(code(sutra::error))]
pub struct SutraError {
    pub kind: ErrorKind,
    pub origin: String,
    pub line: usize,
    pub column: usize,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

impl SutraError {
    pub fn new(kind: ErrorKind, source: &SourceContext, span: Span) -> Self {
        let (line, column) = source.location(span.start);
        Self {
            kind,
            origin: source.name.to_string(),
            line,
            column,
            src: source.to_named_source(),
            span: span.into(),
        }
    }
}

/// Context-aware error creation.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: Span) -> SutraError;

    fn type_mismatch(&self, expected: &str, actual: &str, span: Span) -> SutraError {
        self.report(
            ErrorKind::TypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            },
            span,
        )
    }

    fn arity_mismatch(&self, callee: &str, expected: &str, actual: usize, span: Span) -> SutraError {
        self.report(
            ErrorKind::ArityMismatch {
                callee: callee.into(),
                expected: expected.into(),
                actual,
            },
            span,
        )
    }

    fn malformed(&self, construct: &str, span: Span) -> SutraError {
        self.report(
            ErrorKind::MalformedConstruct {
                construct: construct.into(),
            },
            span,
        )
    }
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ErrorKind, span: Span) -> SutraError {
        SutraError::new(kind, self, span)
    }
}
