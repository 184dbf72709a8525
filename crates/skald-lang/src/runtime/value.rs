//! The tagged value model and its operator tables.
//!
//! Every operator is an exhaustive match over the (lhs, rhs) variant pair;
//! any pair outside the table is a typed error naming the operator sign and
//! the offending type names. Values are immutable — every operation builds a
//! new value or fails.

use std::fmt;

use crate::error::Error;
use crate::syntax::ast::{BinaryOp, UnaryOp};
use crate::types::{VariableType, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(String),
    Vector(Vector3),
    Void,
}

impl Value {
    /// The variable type this value reports. Matches the runtime variant by
    /// construction.
    pub fn ty(&self) -> VariableType {
        match self {
            Self::Int(_) => VariableType::Int,
            Self::Float(_) => VariableType::Float,
            Self::Bool(_) => VariableType::Bool,
            Self::Str(_) => VariableType::Str,
            Self::Vector(_) => VariableType::Vector,
            Self::Void => VariableType::Void,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Explicit conversion, the `cast<type>` table. Total for every source
    /// type except `void`; string sources parse their content.
    pub fn cast(&self, to: VariableType) -> Result<Value, Error> {
        use VariableType as T;
        match (self, to) {
            (Self::Int(v), T::Int) => Ok(Self::Int(*v)),
            (Self::Int(v), T::Float) => Ok(Self::Float(*v as f32)),
            (Self::Int(v), T::Bool) => Ok(Self::Bool(*v != 0)),
            (Self::Int(v), T::Str) => Ok(Self::Str(v.to_string())),
            (Self::Int(v), T::Vector) => Ok(Self::Vector(Vector3::splat(*v as f32))),

            (Self::Float(v), T::Int) => Ok(Self::Int(*v as i32)),
            (Self::Float(v), T::Float) => Ok(Self::Float(*v)),
            (Self::Float(v), T::Bool) => Ok(Self::Bool(*v != 0.0)),
            (Self::Float(v), T::Str) => Ok(Self::Str(v.to_string())),
            (Self::Float(v), T::Vector) => Ok(Self::Vector(Vector3::splat(*v))),

            (Self::Bool(v), T::Int) => Ok(Self::Int(i32::from(*v))),
            (Self::Bool(v), T::Float) => Ok(Self::Float(i32::from(*v) as f32)),
            (Self::Bool(v), T::Bool) => Ok(Self::Bool(*v)),
            (Self::Bool(v), T::Str) => Ok(Self::Str(v.to_string())),
            (Self::Bool(v), T::Vector) => Ok(Self::Vector(Vector3::splat(i32::from(*v) as f32))),

            (Self::Str(s), T::Int) => s
                .trim()
                .parse::<i32>()
                .map(Self::Int)
                .map_err(|_| Error::type_error(format!("unable to cast '{s}' to 'int'"))),
            (Self::Str(s), T::Float) => s
                .trim()
                .parse::<f32>()
                .map(Self::Float)
                .map_err(|_| Error::type_error(format!("unable to cast '{s}' to 'float'"))),
            // Inherited contract: "0" casts to true alongside "true",
            // everything else to false.
            (Self::Str(s), T::Bool) => Ok(Self::Bool(s == "true" || s == "0")),
            (Self::Str(s), T::Str) => Ok(Self::Str(s.clone())),
            (Self::Str(s), T::Vector) => Ok(Self::Vector(Vector3::parse_lenient(s))),

            (Self::Vector(v), T::Int) => Ok(Self::Int(v.x as i32)),
            (Self::Vector(v), T::Float) => Ok(Self::Float(v.x)),
            (Self::Vector(v), T::Bool) => Ok(Self::Bool(v.x != 0.0)),
            (Self::Vector(v), T::Str) => Ok(Self::Str(v.to_string())),
            (Self::Vector(v), T::Vector) => Ok(Self::Vector(*v)),

            (_, T::Void) | (Self::Void, _) => Err(Error::type_error(format!(
                "unable to cast '{}' to '{}'",
                self.type_name(),
                to.name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Vector(v) => write!(f, "{v}"),
            Self::Void => write!(f, "void"),
        }
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

pub fn apply_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    match op {
        // Assign never reaches the value model — it needs the environment.
        BinaryOp::Assign => Err(Error::internal("assignment dispatched to value model")),
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => sub(lhs, rhs),
        BinaryOp::Mul => mul(lhs, rhs),
        BinaryOp::Div => div(lhs, rhs),
        BinaryOp::Mod => modulo(lhs, rhs),
        BinaryOp::Pow => pow(lhs, rhs),
        BinaryOp::And => and(lhs, rhs),
        BinaryOp::Or => or(lhs, rhs),
        BinaryOp::Gt => ordering(">", lhs, rhs, |a, b| a > b, |a, b| a > b, |a, b| a > b),
        BinaryOp::Lt => ordering("<", lhs, rhs, |a, b| a < b, |a, b| a < b, |a, b| a < b),
        BinaryOp::Geq => ordering(">=", lhs, rhs, |a, b| a >= b, |a, b| a >= b, |a, b| a >= b),
        BinaryOp::Leq => ordering("<=", lhs, rhs, |a, b| a <= b, |a, b| a <= b, |a, b| a <= b),
        BinaryOp::Eq => equality("==", lhs, rhs, true),
        BinaryOp::Neq => equality("!=", lhs, rhs, false),
    }
}

pub fn apply_unary(op: UnaryOp, value: &Value) -> Result<Value, Error> {
    match op {
        UnaryOp::Neg => match value {
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::Float(v) => Ok(Value::Float(-v)),
            Value::Vector(v) => Ok(Value::Vector(-*v)),
            _ => Err(unary_type_error("-", value)),
        },
        UnaryOp::Not => match value {
            Value::Bool(v) => Ok(Value::Bool(!v)),
            _ => Err(unary_type_error("!", value)),
        },
        UnaryOp::Cast(to) => value.cast(to),
    }
}

// ─── Arithmetic ──────────────────────────────────────────────────────────────

fn add(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(a), Int(b)) => Ok(Int(a.wrapping_add(*b))),
        (Int(a), Float(b)) => Ok(Float(*a as f32 + b)),
        (Int(a), Vector(v)) => Ok(Vector(Vector3::splat(*a as f32) + *v)),
        (Float(a), Int(b)) => Ok(Float(a + *b as f32)),
        (Float(a), Float(b)) => Ok(Float(a + b)),
        (Float(a), Vector(v)) => Ok(Vector(Vector3::splat(*a) + *v)),
        (Str(a), Str(b)) => Ok(Str(format!("{a}{b}"))),
        (Vector(v), Int(b)) => Ok(Vector(*v + Vector3::splat(*b as f32))),
        (Vector(v), Float(b)) => Ok(Vector(*v + Vector3::splat(*b))),
        (Vector(a), Vector(b)) => Ok(Vector(*a + *b)),
        _ => Err(binary_type_error("+", lhs, rhs)),
    }
}

fn sub(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(a), Int(b)) => Ok(Int(a.wrapping_sub(*b))),
        (Int(a), Float(b)) => Ok(Float(*a as f32 - b)),
        (Int(a), Vector(v)) => Ok(Vector(Vector3::splat(*a as f32) - *v)),
        (Float(a), Int(b)) => Ok(Float(a - *b as f32)),
        (Float(a), Float(b)) => Ok(Float(a - b)),
        (Float(a), Vector(v)) => Ok(Vector(Vector3::splat(*a) - *v)),
        (Vector(v), Int(b)) => Ok(Vector(*v - Vector3::splat(*b as f32))),
        (Vector(v), Float(b)) => Ok(Vector(*v - Vector3::splat(*b))),
        (Vector(a), Vector(b)) => Ok(Vector(*a - *b)),
        _ => Err(binary_type_error("-", lhs, rhs)),
    }
}

fn mul(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(a), Int(b)) => Ok(Int(a.wrapping_mul(*b))),
        (Int(a), Float(b)) => Ok(Float(*a as f32 * b)),
        (Int(a), Vector(v)) => Ok(Vector(Vector3::splat(*a as f32) * *v)),
        (Float(a), Int(b)) => Ok(Float(a * *b as f32)),
        (Float(a), Float(b)) => Ok(Float(a * b)),
        (Float(a), Vector(v)) => Ok(Vector(Vector3::splat(*a) * *v)),
        (Vector(v), Int(b)) => Ok(Vector(*v * Vector3::splat(*b as f32))),
        (Vector(v), Float(b)) => Ok(Vector(*v * Vector3::splat(*b))),
        (Vector(a), Vector(b)) => Ok(Vector(*a * *b)),
        _ => Err(binary_type_error("*", lhs, rhs)),
    }
}

fn div(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(_), Int(0)) => Err(Error::type_error("division by zero")),
        (Int(a), Int(b)) => Ok(Int(a.wrapping_div(*b))),
        (Int(a), Float(b)) => Ok(Float(*a as f32 / b)),
        (Int(a), Vector(v)) => Ok(Vector(Vector3::splat(*a as f32) / *v)),
        (Float(a), Int(b)) => Ok(Float(a / *b as f32)),
        (Float(a), Float(b)) => Ok(Float(a / b)),
        (Float(a), Vector(v)) => Ok(Vector(Vector3::splat(*a) / *v)),
        (Vector(v), Int(b)) => Ok(Vector(*v / Vector3::splat(*b as f32))),
        (Vector(v), Float(b)) => Ok(Vector(*v / Vector3::splat(*b))),
        (Vector(a), Vector(b)) => Ok(Vector(*a / *b)),
        _ => Err(binary_type_error("/", lhs, rhs)),
    }
}

fn modulo(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        // Modulo by zero is defined as zero, not an error.
        (Int(_), Int(0)) => Ok(Int(0)),
        (Int(a), Int(b)) => Ok(Int(a.wrapping_rem(*b))),
        (Float(_), Int(0)) => Ok(Float(0.0)),
        (Float(a), Int(b)) => Ok(Float((*a as i32).wrapping_rem(*b) as f32)),
        _ => Err(binary_type_error("%", lhs, rhs)),
    }
}

fn pow(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        // Real-valued power, truncated back to int only for int^int.
        (Int(a), Int(b)) => Ok(Int((*a as f32).powf(*b as f32) as i32)),
        (Int(a), Float(b)) => Ok(Float((*a as f32).powf(*b))),
        (Float(a), Int(b)) => Ok(Float(a.powf(*b as f32))),
        (Float(a), Float(b)) => Ok(Float(a.powf(*b))),
        _ => Err(binary_type_error("^", lhs, rhs)),
    }
}

// ─── Logic ───────────────────────────────────────────────────────────────────

fn and(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(a), Int(b)) => Ok(Int(a & b)),
        (Bool(a), Bool(b)) => Ok(Bool(a & b)),
        _ => Err(binary_type_error("&", lhs, rhs)),
    }
}

fn or(lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    use Value::*;
    match (lhs, rhs) {
        (Int(a), Int(b)) => Ok(Int(a | b)),
        (Bool(a), Bool(b)) => Ok(Bool(a | b)),
        _ => Err(binary_type_error("|", lhs, rhs)),
    }
}

// ─── Comparison ──────────────────────────────────────────────────────────────

/// The four ordering comparisons: defined for the numeric cross product and
/// for strings (lexicographic).
fn ordering(
    sign: &'static str,
    lhs: &Value,
    rhs: &Value,
    icmp: impl Fn(i32, i32) -> bool,
    fcmp: impl Fn(f32, f32) -> bool,
    scmp: impl Fn(&str, &str) -> bool,
) -> Result<Value, Error> {
    use Value::*;
    let result = match (lhs, rhs) {
        (Int(a), Int(b)) => icmp(*a, *b),
        (Int(a), Float(b)) => fcmp(*a as f32, *b),
        (Float(a), Int(b)) => fcmp(*a, *b as f32),
        (Float(a), Float(b)) => fcmp(*a, *b),
        (Str(a), Str(b)) => scmp(a, b),
        _ => return Err(binary_type_error(sign, lhs, rhs)),
    };
    Ok(Value::Bool(result))
}

/// Equality and inequality: numeric cross product plus bool, string and
/// component-wise vector.
fn equality(sign: &'static str, lhs: &Value, rhs: &Value, want_equal: bool) -> Result<Value, Error> {
    use Value::*;
    let equal = match (lhs, rhs) {
        (Int(a), Int(b)) => a == b,
        (Int(a), Float(b)) => *a as f32 == *b,
        (Float(a), Int(b)) => *a == *b as f32,
        (Float(a), Float(b)) => a == b,
        (Bool(a), Bool(b)) => a == b,
        (Str(a), Str(b)) => a == b,
        (Vector(a), Vector(b)) => a == b,
        _ => return Err(binary_type_error(sign, lhs, rhs)),
    };
    Ok(Value::Bool(equal == want_equal))
}

// ─── Errors ──────────────────────────────────────────────────────────────────

fn binary_type_error(sign: &str, lhs: &Value, rhs: &Value) -> Error {
    Error::type_error(format!(
        "binary operator '{sign}' does not accept '{}' and '{}'",
        lhs.type_name(),
        rhs.type_name()
    ))
}

fn unary_type_error(sign: &str, value: &Value) -> Error {
    Error::type_error(format!(
        "unary operator '{sign}' does not accept '{}'",
        value.type_name()
    ))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
