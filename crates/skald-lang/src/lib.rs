//! An embeddable infix expression language.
//!
//! Text goes in, a typed [`Value`] comes out: the tokenizer classifies
//! identifiers against an [`Environment`] (variables and overloaded
//! functions), a shunting-yard parser builds an expression tree, and a
//! recursive evaluator walks it. Single expressions only — there are no
//! statements or control flow.
//!
//! ```
//! use skald_lang::{Environment, Value, VariableType, eval, eval_in};
//!
//! assert_eq!(eval("2+3*4"), Ok(Value::Int(14)));
//!
//! let mut env = Environment::new();
//! env.define("health", Value::Int(80));
//! env.register_function("min", vec![VariableType::Int, VariableType::Int],
//!     VariableType::Int, |args, _| match args {
//!         [Value::Int(a), Value::Int(b)] => Ok(Value::Int(*a.min(b))),
//!         _ => unreachable!(),
//!     });
//! assert_eq!(eval_in("min(health + 25, 100)", &mut env), Ok(Value::Int(100)));
//! ```

pub mod error;
pub mod runtime;
pub mod syntax;
pub mod types;

pub use error::Error;
pub use runtime::env::Environment;
pub use runtime::function::Function;
pub use runtime::interpreter::evaluate;
pub use runtime::value::Value;
pub use syntax::ast::{BinaryOp, Expr, UnaryOp};
pub use types::{VariableType, Vector3};

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse `input` into an expression tree, resolving identifiers and call
/// overloads against `env`. Argument type discovery evaluates call arguments
/// once during parsing, so side-effecting arguments touch `env` here already.
pub fn parse(input: &str, env: &mut Environment) -> Result<Expr, Error> {
    syntax::parser::parse(input, env)
}

/// Parse and evaluate against a fresh default environment.
pub fn eval(input: &str) -> Result<Value, Error> {
    let mut env = Environment::new();
    eval_in(input, &mut env)
}

/// Parse and evaluate against the caller's environment.
pub fn eval_in(input: &str, env: &mut Environment) -> Result<Value, Error> {
    let tree = parse(input, env)?;
    evaluate(&tree, env)
}

/// Parse, evaluate and cast the result to an integer.
pub fn eval_as_int(input: &str) -> Result<i32, Error> {
    let mut env = Environment::new();
    eval_as_int_in(input, &mut env)
}

pub fn eval_as_int_in(input: &str, env: &mut Environment) -> Result<i32, Error> {
    match eval_in(input, env)?.cast(VariableType::Int)? {
        Value::Int(v) => Ok(v),
        other => Err(Error::internal(format!("int cast produced '{}'", other.type_name()))),
    }
}

/// Parse, evaluate and cast the result to a float.
pub fn eval_as_float(input: &str) -> Result<f32, Error> {
    let mut env = Environment::new();
    eval_as_float_in(input, &mut env)
}

pub fn eval_as_float_in(input: &str, env: &mut Environment) -> Result<f32, Error> {
    match eval_in(input, env)?.cast(VariableType::Float)? {
        Value::Float(v) => Ok(v),
        other => Err(Error::internal(format!("float cast produced '{}'", other.type_name()))),
    }
}

/// Parse, evaluate and cast the result to its textual rendering.
pub fn eval_as_string(input: &str) -> Result<String, Error> {
    let mut env = Environment::new();
    eval_as_string_in(input, &mut env)
}

pub fn eval_as_string_in(input: &str, env: &mut Environment) -> Result<String, Error> {
    match eval_in(input, env)?.cast(VariableType::Str)? {
        Value::Str(v) => Ok(v),
        other => Err(Error::internal(format!("string cast produced '{}'", other.type_name()))),
    }
}

/// Parse, evaluate and cast the result to a vector.
pub fn eval_as_vector(input: &str) -> Result<Vector3, Error> {
    let mut env = Environment::new();
    eval_as_vector_in(input, &mut env)
}

pub fn eval_as_vector_in(input: &str, env: &mut Environment) -> Result<Vector3, Error> {
    match eval_in(input, env)?.cast(VariableType::Vector)? {
        Value::Vector(v) => Ok(v),
        other => Err(Error::internal(format!("vector cast produced '{}'", other.type_name()))),
    }
}
