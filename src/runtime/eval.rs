//! Core recursive evaluator and special forms.

use std::sync::Arc;

use super::{Env, EvalError, Interpreter, Lambda, Value};
use crate::syntax::error::ErrorReporting;
use crate::syntax::{AstNode, ErrorKind, Expr, Span};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

impl Interpreter {
    /// Evaluates one node in the given lexical environment.
    ///
    /// Grows the native stack on demand, so the depth limit is the only bound
    /// on script recursion regardless of the calling thread's stack size.
    pub fn eval(&mut self, node: &AstNode, env: &Env) -> Result<Value, EvalError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.eval_node(node, env))
    }

    fn eval_node(&mut self, node: &AstNode, env: &Env) -> Result<Value, EvalError> {
        match &*node.value {
            Expr::Nil => Ok(Value::Nil),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Symbol(name) => self.resolve_symbol(name, node.span, env),
            Expr::Quote(inner) => Ok(quote_to_value(inner)),
            Expr::List(items) => self.eval_list(items, node.span, env),
        }
    }

    /// Evaluates nodes in order and returns the last value (`nil` when empty).
    pub fn eval_body(&mut self, body: &[AstNode], env: &Env) -> Result<Value, EvalError> {
        let mut result = Value::Nil;
        for node in body {
            result = self.eval(node, env)?;
        }
        Ok(result)
    }

    /// Calls a lambda or native with already evaluated arguments.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> Result<Value, EvalError> {
        match callee {
            Value::Lambda(lambda) => self.call_lambda(lambda, args, span),
            Value::Native(native) => native.call(self, args, span),
            other => Err(self.fault(
                ErrorKind::NotCallable {
                    actual: other.type_name().into(),
                },
                span,
            )),
        }
    }

    fn call_lambda(
        &mut self,
        lambda: &Arc<Lambda>,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, EvalError> {
        if args.len() != lambda.params.len() {
            let callee = lambda.name.as_deref().unwrap_or("lambda");
            return Err(self
                .arity_mismatch(callee, &lambda.params.len().to_string(), args.len(), span)
                .into());
        }
        if self.depth >= self.max_depth {
            return Err(self.fault(ErrorKind::RecursionLimit, span));
        }

        let mut env = lambda.env.clone();
        for (param, arg) in lambda.params.iter().zip(args) {
            env.insert(param.clone(), arg);
        }

        let previous = std::mem::replace(&mut self.source, lambda.source.clone());
        self.depth += 1;
        let result = self.eval_body(&lambda.body, &env);
        self.depth -= 1;
        self.source = previous;
        result
    }

    fn resolve_symbol(&self, name: &str, span: Span, env: &Env) -> Result<Value, EvalError> {
        if let Some(value) = env.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        Err(self.fault(
            ErrorKind::UndefinedSymbol {
                symbol: name.to_string(),
            },
            span,
        ))
    }

    fn eval_list(&mut self, items: &[AstNode], span: Span, env: &Env) -> Result<Value, EvalError> {
        let Some((head, tail)) = items.split_first() else {
            return Ok(Value::Nil);
        };

        // Local bindings shadow special forms.
        if let Some(name) = head.value.as_symbol().filter(|name| !env.contains_key(*name)) {
            match name {
                "quote" => return self.eval_quote(tail, span),
                "if" => return self.eval_if(tail, span, env),
                "define" => return self.eval_define(tail, span, env),
                "lambda" | "fn" => return self.eval_lambda(tail, span, env),
                "let" => return self.eval_let(tail, span, env),
                "do" => return self.eval_body(tail, env),
                "and" => return self.eval_and(tail, env),
                "or" => return self.eval_or(tail, env),
                _ => {}
            }
        }

        let callee = self.eval(head, env)?;
        let args = tail
            .iter()
            .map(|arg| self.eval(arg, env))
            .collect::<Result<Vec<_>, _>>()?;
        self.call(&callee, args, head.span)
    }

    // ------------------------------------------------------------------------
    // Special forms
    // ------------------------------------------------------------------------

    fn eval_quote(&mut self, args: &[AstNode], span: Span) -> Result<Value, EvalError> {
        match args {
            [inner] => Ok(quote_to_value(inner)),
            _ => Err(self.arity_mismatch("quote", "1", args.len(), span).into()),
        }
    }

    fn eval_if(&mut self, args: &[AstNode], span: Span, env: &Env) -> Result<Value, EvalError> {
        let (condition, then_branch, else_branch) = match args {
            [condition, then_branch] => (condition, then_branch, None),
            [condition, then_branch, else_branch] => (condition, then_branch, Some(else_branch)),
            _ => return Err(self.arity_mismatch("if", "2 or 3", args.len(), span).into()),
        };

        if self.eval(condition, env)?.is_truthy() {
            self.eval(then_branch, env)
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch, env)
        } else {
            Ok(Value::Nil)
        }
    }

    /// `(define name value)` or `(define (name params...) body...)`. Always global.
    fn eval_define(&mut self, args: &[AstNode], span: Span, env: &Env) -> Result<Value, EvalError> {
        let Some((target, rest)) = args.split_first() else {
            return Err(self.arity_mismatch("define", "at least 2", 0, span).into());
        };

        match &*target.value {
            Expr::Symbol(name) => {
                let [value_expr] = rest else {
                    return Err(self.arity_mismatch("define", "2", args.len(), span).into());
                };
                let value = self.eval(value_expr, env)?;
                self.define_global(name, value.clone());
                Ok(value)
            }
            Expr::List(signature) => {
                let Some((name_node, params)) = signature.split_first() else {
                    return Err(self.malformed("function signature", target.span).into());
                };
                let Some(name) = name_node.value.as_symbol() else {
                    return Err(self
                        .type_mismatch("symbol", name_node.value.type_name(), name_node.span)
                        .into());
                };
                if rest.is_empty() {
                    return Err(self.malformed("function without body", span).into());
                }
                let params = self.param_names(params)?;
                let lambda = self.make_lambda(Some(name.to_string()), params, rest, env);
                self.define_global(name, lambda.clone());
                Ok(lambda)
            }
            other => Err(self
                .type_mismatch("symbol or signature", other.type_name(), target.span)
                .into()),
        }
    }

    fn eval_lambda(&mut self, args: &[AstNode], span: Span, env: &Env) -> Result<Value, EvalError> {
        let Some((params_node, body)) = args.split_first() else {
            return Err(self.arity_mismatch("lambda", "at least 2", 0, span).into());
        };
        let Expr::List(params) = &*params_node.value else {
            return Err(self
                .type_mismatch("parameter list", params_node.value.type_name(), params_node.span)
                .into());
        };
        if body.is_empty() {
            return Err(self.malformed("lambda without body", span).into());
        }
        let params = self.param_names(params)?;
        Ok(self.make_lambda(None, params, body, env))
    }

    /// `(let ((name value) ...) body...)`, binding sequentially.
    fn eval_let(&mut self, args: &[AstNode], span: Span, env: &Env) -> Result<Value, EvalError> {
        let Some((bindings_node, body)) = args.split_first() else {
            return Err(self.arity_mismatch("let", "at least 1", 0, span).into());
        };
        let Expr::List(bindings) = &*bindings_node.value else {
            return Err(self
                .type_mismatch("binding list", bindings_node.value.type_name(), bindings_node.span)
                .into());
        };

        let mut local = env.clone();
        for binding in bindings {
            let Expr::List(pair) = &*binding.value else {
                return Err(self.malformed("let binding", binding.span).into());
            };
            let [name_node, value_node] = pair.as_slice() else {
                return Err(self.malformed("let binding", binding.span).into());
            };
            let Some(name) = name_node.value.as_symbol() else {
                return Err(self
                    .type_mismatch("symbol", name_node.value.type_name(), name_node.span)
                    .into());
            };
            let value = self.eval(value_node, &local)?;
            local.insert(name.to_string(), value);
        }
        self.eval_body(body, &local)
    }

    fn eval_and(&mut self, args: &[AstNode], env: &Env) -> Result<Value, EvalError> {
        let mut result = Value::Bool(true);
        for arg in args {
            result = self.eval(arg, env)?;
            if !result.is_truthy() {
                break;
            }
        }
        Ok(result)
    }

    fn eval_or(&mut self, args: &[AstNode], env: &Env) -> Result<Value, EvalError> {
        let mut result = Value::Bool(false);
        for arg in args {
            result = self.eval(arg, env)?;
            if result.is_truthy() {
                break;
            }
        }
        Ok(result)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn param_names(&self, params: &[AstNode]) -> Result<Vec<String>, EvalError> {
        params
            .iter()
            .map(|param| match param.value.as_symbol() {
                Some(name) => Ok(name.to_string()),
                None => Err(self
                    .type_mismatch("parameter name", param.value.type_name(), param.span)
                    .into()),
            })
            .collect()
    }

    fn make_lambda(
        &self,
        name: Option<String>,
        params: Vec<String>,
        body: &[AstNode],
        env: &Env,
    ) -> Value {
        Value::Lambda(Arc::new(Lambda {
            name,
            params,
            body: body.to_vec(),
            env: env.clone(),
            source: self.source.clone(),
        }))
    }
}

fn quote_to_value(node: &AstNode) -> Value {
    match &*node.value {
        Expr::Nil => Value::Nil,
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Number(n) => Value::Number(*n),
        Expr::String(s) | Expr::Symbol(s) => Value::String(s.clone()),
        Expr::List(items) => Value::List(items.iter().map(quote_to_value).collect()),
        Expr::Quote(inner) => quote_to_value(inner),
    }
}
