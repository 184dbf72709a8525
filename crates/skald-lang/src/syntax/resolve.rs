//! Call-site overload resolution. Entered from the tokenizer when an
//! identifier names a registered function; produces a completed `Expr::Call`
//! bound to exactly one overload, with explicit casts wrapped around every
//! argument whose type differs from the chosen signature.

use std::rc::Rc;

use tracing::debug;

use crate::error::Error;
use crate::runtime::env::Environment;
use crate::runtime::function::Function;
use crate::runtime::interpreter;
use crate::syntax::ast::{Expr, UnaryOp};
use crate::syntax::lexer::Lexer;
use crate::syntax::parser;
use crate::types::{VariableType, implicit_cast_allowed};

pub(crate) fn resolve_call(
    name: &str,
    lexer: &mut Lexer,
    env: &mut Environment,
) -> Result<Expr, Error> {
    let sources = lexer.read_call_arguments(name)?;
    let overloads = env.overloads(name);

    // `f()` splits into a single empty argument — the one case where an
    // empty string is legal, selecting a zero-arity overload.
    if sources.len() == 1 && sources[0].is_empty() {
        if let Some(f) = overloads.iter().find(|f| f.arity() == 0) {
            return Ok(Expr::Call { name: f.name().to_string(), id: f.id(), args: Vec::new() });
        }
    }

    // Each argument substring is parsed as its own expression...
    let mut args = Vec::with_capacity(sources.len());
    for source in &sources {
        if source.is_empty() {
            return Err(Error::overload(format!("in function '{name}': found empty argument")));
        }
        args.push(parser::parse(source, env)?);
    }

    // ...and evaluated against the live environment to discover its type.
    // Side-effecting arguments therefore run once here and once more when
    // the finished tree is evaluated.
    let mut arg_types = Vec::with_capacity(args.len());
    for arg in &args {
        arg_types.push(interpreter::evaluate(arg, env)?.ty());
    }

    // Narrow position by position: exact matches beat implicit-cast matches,
    // and an empty partition at any position empties the candidate set.
    let mut candidates = overloads.clone();
    for (i, arg_ty) in arg_types.iter().enumerate() {
        let mut exact = Vec::new();
        let mut cast = Vec::new();
        for f in &candidates {
            if f.arity() != args.len() {
                continue;
            }
            if f.params()[i] == *arg_ty {
                exact.push(f.clone());
            } else if implicit_cast_allowed(*arg_ty, f.params()[i]) {
                cast.push(f.clone());
            }
        }
        candidates = if exact.is_empty() { cast } else { exact };
    }

    if let [chosen] = candidates.as_slice() {
        debug!(name, id = chosen.id(), signature = %chosen.header(), "resolved call");
        let chosen = chosen.clone();
        for (i, arg) in args.iter_mut().enumerate() {
            if arg_types[i] != chosen.params()[i] {
                let inner = std::mem::replace(arg, Expr::Literal(crate::runtime::value::Value::Void));
                *arg = Expr::Unary {
                    op: UnaryOp::Cast(chosen.params()[i]),
                    child: Box::new(inner),
                };
            }
        }
        return Ok(Expr::Call { name: chosen.name().to_string(), id: chosen.id(), args });
    }

    Err(no_match_error(name, &arg_types, &candidates, &overloads))
}

/// No unique candidate: list the call as evaluated plus every surviving
/// signature (all registered overloads when nothing survived).
fn no_match_error(
    name: &str,
    arg_types: &[VariableType],
    candidates: &[Rc<Function>],
    overloads: &[Rc<Function>],
) -> Error {
    let rendered: Vec<&str> = arg_types.iter().map(|t| t.name()).collect();
    let mut message = format!(
        "{} {name}({})\ncandidates are:",
        if candidates.is_empty() { "no matching function for call to" } else { "ambiguous function call to" },
        rendered.join(",")
    );
    let listed = if candidates.is_empty() { overloads } else { candidates };
    for f in listed {
        message.push_str("\n   ");
        message.push_str(&f.header());
    }
    Error::Overload(message)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
