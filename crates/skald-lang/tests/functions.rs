//! Function registration, call parsing and overload resolution, exercised
//! through the public parse/eval surface.

use pretty_assertions::assert_eq;
use skald_lang::{Environment, Error, Value, VariableType, eval_in};

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `f(int)` and `f(float)`, each reporting which overload ran.
fn env_with_numeric_overloads() -> Environment {
    let mut env = Environment::new();
    env.register_function("f", vec![VariableType::Int], VariableType::Str, |_, _| {
        Ok(Value::Str("int overload".into()))
    });
    env.register_function("f", vec![VariableType::Float], VariableType::Str, |_, _| {
        Ok(Value::Str("float overload".into()))
    });
    env
}

// ─── Resolution ──────────────────────────────────────────────────────────────

#[test]
fn exact_match_preferred_over_cast() {
    let mut env = env_with_numeric_overloads();
    assert_eq!(eval_in("f(5)", &mut env), Ok(Value::Str("int overload".into())));
    assert_eq!(eval_in("f(5.0)", &mut env), Ok(Value::Str("float overload".into())));
}

#[test]
fn no_match_reports_call_and_all_candidates() {
    let mut env = env_with_numeric_overloads();
    let err = eval_in("f(true)", &mut env).expect_err("expected no match");
    let Error::Overload(message) = err else { panic!("expected overload error: {err}") };
    assert!(message.contains("no matching function for call to f(bool)"), "{message}");
    assert!(message.contains("f(int)"), "{message}");
    assert!(message.contains("f(float)"), "{message}");
}

#[test]
fn implicit_cast_applies_when_no_exact_match() {
    let mut env = Environment::new();
    env.register_function("half", vec![VariableType::Float], VariableType::Float, |args, _| {
        match args {
            [Value::Float(v)] => Ok(Value::Float(v / 2.0)),
            _ => Err(Error::internal("bad arguments")),
        }
    });
    // int argument reaches the float overload through an inserted cast
    assert_eq!(eval_in("half(5)", &mut env), Ok(Value::Float(2.5)));
}

#[test]
fn only_numeric_types_cast_implicitly() {
    let mut env = Environment::new();
    env.register_function("s", vec![VariableType::Str], VariableType::Void, |_, _| {
        Ok(Value::Void)
    });
    assert!(matches!(eval_in("s(5)", &mut env), Err(Error::Overload(_))));
    assert!(matches!(eval_in(r#"s("ok")"#, &mut env), Ok(Value::Void)));
}

#[test]
fn zero_arity_function() {
    let mut env = Environment::new();
    env.register_function("seven", vec![], VariableType::Int, |_, _| Ok(Value::Int(7)));
    assert_eq!(eval_in("seven()", &mut env), Ok(Value::Int(7)));
    assert_eq!(eval_in("seven() + 1", &mut env), Ok(Value::Int(8)));
}

#[test]
fn empty_argument_is_an_error_without_zero_arity_overload() {
    let mut env = env_with_numeric_overloads();
    assert_eq!(
        eval_in("f()", &mut env),
        Err(Error::Overload("in function 'f': found empty argument".into()))
    );
}

#[test]
fn wrong_arity_is_no_match() {
    let mut env = env_with_numeric_overloads();
    assert!(matches!(eval_in("f(1, 2)", &mut env), Err(Error::Overload(_))));
}

// ─── Arguments ───────────────────────────────────────────────────────────────

#[test]
fn arguments_evaluate_in_declared_order() {
    let mut env = Environment::new();
    env.define("log", Value::Str(String::new()));
    env.register_function(
        "pair",
        vec![VariableType::Str, VariableType::Str],
        VariableType::Str,
        |args, _| match args {
            [Value::Str(a), Value::Str(b)] => Ok(Value::Str(format!("{a}|{b}"))),
            _ => Err(Error::internal("bad arguments")),
        },
    );
    // type discovery runs a, then b ("ab"); the real pass appends a, then b
    // on top of that — strictly left before right both times
    assert_eq!(
        eval_in(r#"pair(log = log + "a", log = log + "b")"#, &mut env),
        Ok(Value::Str("aba|abab".into()))
    );
}

#[test]
fn argument_expressions_run_twice_when_side_effecting() {
    // the inherited quirk: type discovery evaluates arguments eagerly during
    // parsing, then the real pass evaluates them again
    let mut env = Environment::new();
    env.define("n", Value::Int(0));
    env.register_function("id", vec![VariableType::Int], VariableType::Int, |args, _| {
        Ok(args[0].clone())
    });
    assert_eq!(eval_in("id(n = n + 1)", &mut env), Ok(Value::Int(2)));
    assert_eq!(env.read("n"), Ok(Value::Int(2)));
}

#[test]
fn nested_calls() {
    let mut env = Environment::new();
    env.register_function("inc", vec![VariableType::Int], VariableType::Int, |args, _| {
        match args {
            [Value::Int(v)] => Ok(Value::Int(v + 1)),
            _ => Err(Error::internal("bad arguments")),
        }
    });
    assert_eq!(eval_in("inc(inc(inc(0)))", &mut env), Ok(Value::Int(3)));
    assert_eq!(eval_in("inc((1+2)*2)", &mut env), Ok(Value::Int(7)));
}

#[test]
fn call_argument_may_contain_commas_in_nested_calls() {
    let mut env = Environment::new();
    env.register_function(
        "add",
        vec![VariableType::Int, VariableType::Int],
        VariableType::Int,
        |args, _| match args {
            [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
            _ => Err(Error::internal("bad arguments")),
        },
    );
    assert_eq!(eval_in("add(add(1, 2), add(3, 4))", &mut env), Ok(Value::Int(10)));
}

#[test]
fn missing_argument_parenthesis() {
    let mut env = env_with_numeric_overloads();
    assert!(matches!(eval_in("f 5", &mut env), Err(Error::Parse(_))));
    assert!(matches!(eval_in("f(5", &mut env), Err(Error::Parse(_))));
}

// ─── Functions touching the environment ──────────────────────────────────────

#[test]
fn function_body_may_read_the_environment() {
    let mut env = Environment::new();
    env.define("scale", Value::Int(10));
    env.register_function("scaled", vec![VariableType::Int], VariableType::Int, |args, env| {
        let scale = env.read("scale")?;
        match (&args[0], scale) {
            (Value::Int(v), Value::Int(s)) => Ok(Value::Int(v * s)),
            _ => Err(Error::internal("bad arguments")),
        }
    });
    assert_eq!(eval_in("scaled(4)", &mut env), Ok(Value::Int(40)));
}

#[test]
fn call_result_composes_with_operators() {
    let mut env = Environment::new();
    env.register_function("three", vec![], VariableType::Int, |_, _| Ok(Value::Int(3)));
    assert_eq!(eval_in("2*three()+1", &mut env), Ok(Value::Int(7)));
    assert_eq!(eval_in("-three()", &mut env), Ok(Value::Int(-3)));
}
