//! Turns suite and utility scripts into [`AstNode`]s.
//!
//! The grammar lives in `grammar.pest`. Every node keeps the byte span it was
//! read from so runtime errors can point back into the script.

use std::sync::Arc;

use pest::error::{Error, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::error::{ErrorKind, ErrorReporting, SourceContext, SutraError};
use super::{AstNode, Expr, Span, Spanned};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct ScriptGrammar;

/// Parses a whole script into its top-level forms.
pub fn parse(source: &SourceContext) -> Result<Vec<AstNode>, SutraError> {
    let program = ScriptGrammar::parse(Rule::program, &source.content)
        .map_err(|err| syntax_error(err, source))?
        .next();

    match program {
        Some(program) => program
            .into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .map(|pair| lower(pair, source))
            .collect(),
        None => Ok(Vec::new()),
    }
}

fn lower(pair: Pair<Rule>, source: &SourceContext) -> Result<AstNode, SutraError> {
    let span = span_of(&pair);
    let expr = match pair.as_rule() {
        Rule::number => number_literal(pair.as_str(), span, source)?,
        Rule::boolean => Expr::Bool(pair.as_str() == "true"),
        Rule::nil => Expr::Nil,
        Rule::symbol => Expr::Symbol(pair.as_str().to_string()),
        Rule::string => {
            let raw = pair.into_inner().next().map_or("", |inner| inner.as_str());
            Expr::String(unescape(raw))
        }
        Rule::list => Expr::List(
            pair.into_inner()
                .map(|child| lower(child, source))
                .collect::<Result<_, _>>()?,
        ),
        Rule::quote => match pair.into_inner().next() {
            Some(inner) => Expr::Quote(lower(inner, source)?),
            None => return Err(source.malformed("quote without expression", span)),
        },
        rule => return Err(source.malformed(&format!("unexpected {:?}", rule), span)),
    };
    Ok(Spanned {
        value: Arc::new(expr),
        span,
    })
}

fn number_literal(text: &str, span: Span, source: &SourceContext) -> Result<Expr, SutraError> {
    text.parse::<f64>().map(Expr::Number).map_err(|_| {
        source.report(
            ErrorKind::InvalidLiteral {
                literal_type: "number".into(),
                value: text.into(),
            },
            span,
        )
    })
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    Span::new(span.start(), span.end())
}

/// Resolves `\n`, `\t`, `\r`, `\\` and `\"`. Unknown escapes are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(escaped @ ('\\' | '"')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn syntax_error(err: Error<Rule>, source: &SourceContext) -> SutraError {
    let span = match err.location {
        InputLocation::Pos(pos) => Span::new(pos, pos),
        InputLocation::Span((start, end)) => Span::new(start, end),
    };
    let message = if span.start >= source.content.len() {
        "unexpected end of input".to_string()
    } else {
        err.variant.message().into_owned()
    };
    source.report(ErrorKind::Syntax { message }, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<Vec<AstNode>, SutraError> {
        parse(&SourceContext::from_file("test", text))
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("  ; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_simple_number() {
        let nodes = parse_str("42").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(*nodes[0].value, Expr::Number(42.0));
    }

    #[test]
    fn negative_numbers_and_minus_symbol() {
        let nodes = parse_str("(- -3 1.5)").unwrap();
        let Expr::List(items) = &*nodes[0].value else {
            panic!("expected list");
        };
        assert_eq!(*items[0].value, Expr::Symbol("-".into()));
        assert_eq!(*items[1].value, Expr::Number(-3.0));
        assert_eq!(*items[2].value, Expr::Number(1.5));
    }

    #[test]
    fn literals_are_not_symbols() {
        let nodes = parse_str("true false nil nil? truthy").unwrap();
        let kinds: Vec<_> = nodes.iter().map(|n| n.value.type_name()).collect();
        assert_eq!(kinds, ["bool", "bool", "nil", "symbol", "symbol"]);
    }

    #[test]
    fn strings_are_unescaped() {
        let nodes = parse_str(r#""a \"quoted\"\nline""#).unwrap();
        assert_eq!(*nodes[0].value, Expr::String("a \"quoted\"\nline".into()));
    }

    #[test]
    fn quote_wraps_next_expression() {
        let nodes = parse_str("'(1 2)").unwrap();
        let Expr::Quote(inner) = &*nodes[0].value else {
            panic!("expected quote");
        };
        assert_eq!(inner.value.type_name(), "list");
    }

    #[test]
    fn spans_cover_source_text() {
        let nodes = parse_str("  (host/load \"x\")").unwrap();
        assert_eq!(nodes[0].span, Span::new(2, 17));
    }

    #[test]
    fn test_unmatched_paren() {
        let err = parse_str("(a b").unwrap_err();
        assert_eq!(err.kind.code_suffix(), "parse");
    }
}
