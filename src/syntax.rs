//! Syntax for the Sutra dialect used by the fallback engine.
//!
//! Provides the AST node types with source location tracking. Parsing lives in
//! [`parser`], diagnostics in [`error`].

use std::fmt;
use std::sync::Arc;

use miette::SourceSpan;

pub mod error;
pub mod parser;

pub use error::{ErrorKind, SourceContext, SutraError};

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

/// Canonical AST node type. Lambdas keep their bodies alive through the `Arc`.
pub type AstNode = Spanned<Arc<Expr>>;

/// The core AST node for Sutra expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(String),
    List(Vec<AstNode>),
    Quote(AstNode),
}

impl Expr {
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Nil => "nil",
            Expr::Bool(_) => "bool",
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Symbol(_) => "symbol",
            Expr::List(_) => "list",
            Expr::Quote(_) => "quote",
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nil => write!(f, "nil"),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => write!(f, "{:?}", s),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                write!(f, ")")
            }
            Expr::Quote(inner) => write!(f, "'{}", inner.value),
        }
    }
}
