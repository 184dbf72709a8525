//! Tree-walking evaluator. A single recursive pass over the expression tree,
//! pure except for variable reads and assignment writes through the
//! environment.

use crate::error::Error;
use crate::runtime::env::Environment;
use crate::runtime::value::{self, Value};
use crate::syntax::ast::{BinaryOp, Expr};

pub fn evaluate(expr: &Expr, env: &mut Environment) -> Result<Value, Error> {
    match expr {
        Expr::Literal(Value::Void) => Err(Error::internal("void literal in expression tree")),
        Expr::Literal(v) => Ok(v.clone()),

        Expr::Variable(name) => env.read(name),

        Expr::Unary { op, child } => {
            let v = evaluate(child, env)?;
            value::apply_unary(*op, &v)
        }

        Expr::Binary { op: BinaryOp::Assign, lhs, rhs } => {
            let Expr::Variable(name) = lhs.as_ref() else {
                return Err(Error::parse("left-hand side of assignment must be a variable"));
            };
            let v = evaluate(rhs, env)?;
            env.update(name, v);
            env.read(name)
        }

        // Left before right, always.
        Expr::Binary { op, lhs, rhs } => {
            let l = evaluate(lhs, env)?;
            let r = evaluate(rhs, env)?;
            value::apply_binary(*op, &l, &r)
        }

        Expr::Call { name, id, args } => {
            let function = env.function(*id)?;
            if args.len() != function.arity() {
                return Err(Error::internal(format!(
                    "call to '{name}' carries {} arguments, signature {} expects {}",
                    args.len(),
                    function.header(),
                    function.arity()
                )));
            }
            let mut evaluated = Vec::with_capacity(args.len());
            for (i, arg) in args.iter().enumerate() {
                let v = evaluate(arg, env)?;
                // The parser already resolved the overload and inserted casts;
                // a mismatch here means the tree is inconsistent, not that the
                // user wrote a type error.
                let declared = function.params()[i];
                if v.ty() != declared {
                    return Err(Error::internal(format!(
                        "type mismatch in function '{name}' for argument {i}: \
                         unable to pass '{}' as '{}'",
                        v.type_name(),
                        declared.name()
                    )));
                }
                evaluated.push(v);
            }
            function.invoke(&evaluated, env)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::UnaryOp;
    use crate::types::VariableType;

    fn lit(v: i32) -> Expr {
        Expr::Literal(Value::Int(v))
    }

    #[test]
    fn literal_evaluates_to_copy() {
        let mut env = Environment::new();
        assert_eq!(evaluate(&lit(7), &mut env), Ok(Value::Int(7)));
    }

    #[test]
    fn void_literal_is_internal_error() {
        let mut env = Environment::new();
        let err = evaluate(&Expr::Literal(Value::Void), &mut env).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn assign_requires_variable_lhs() {
        let mut env = Environment::new();
        let tree = Expr::Binary {
            op: BinaryOp::Assign,
            lhs: Box::new(lit(1)),
            rhs: Box::new(lit(2)),
        };
        assert!(matches!(evaluate(&tree, &mut env), Err(Error::Parse(_))));
    }

    #[test]
    fn assign_writes_then_returns_new_binding() {
        let mut env = Environment::new();
        env.define("x", Value::Int(0));
        let tree = Expr::Binary {
            op: BinaryOp::Assign,
            lhs: Box::new(Expr::Variable("x".into())),
            rhs: Box::new(lit(9)),
        };
        assert_eq!(evaluate(&tree, &mut env), Ok(Value::Int(9)));
        assert_eq!(env.read("x"), Ok(Value::Int(9)));
    }

    #[test]
    fn call_argument_mismatch_is_internal() {
        let mut env = Environment::new();
        let id = env.register_function("f", vec![VariableType::Bool], VariableType::Void, |_, _| {
            Ok(Value::Void)
        });
        // A hand-built tree that skips the parser's cast insertion.
        let tree = Expr::Call { name: "f".into(), id, args: vec![lit(1)] };
        assert!(matches!(evaluate(&tree, &mut env), Err(Error::Internal(_))));
    }

    #[test]
    fn unary_over_call_free_tree() {
        let mut env = Environment::new();
        let tree = Expr::Unary {
            op: UnaryOp::Cast(VariableType::Float),
            child: Box::new(Expr::Unary { op: UnaryOp::Neg, child: Box::new(lit(3)) }),
        };
        assert_eq!(evaluate(&tree, &mut env), Ok(Value::Float(-3.0)));
    }
}
