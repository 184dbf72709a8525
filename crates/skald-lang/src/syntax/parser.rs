//! Shunting-yard parser: an output stack of completed subtrees and an
//! operator stack of pending operators/parentheses. Trees are reduced
//! in place, so the single surviving output node is the parse result.

use tracing::trace;

use crate::error::Error;
use crate::runtime::env::Environment;
use crate::syntax::ast::{Assoc, BinaryOp, Expr, UnaryOp};
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};

/// Parse one expression. The environment is needed to classify identifiers
/// and to resolve call overloads; argument type discovery may run visible
/// side effects through it (see `resolve`).
pub fn parse(input: &str, env: &mut Environment) -> Result<Expr, Error> {
    trace!(input, "parsing expression");

    let mut lexer = Lexer::new(input);
    let mut output: Vec<Expr> = Vec::new();
    let mut operators: Vec<OpEntry> = Vec::new();
    // Start of input behaves like an open parenthesis so that a leading `-`
    // is unary.
    let mut prev = TokenKind::OpenParen;

    while let Some(token) = lexer.next_token(prev, env)? {
        let kind = token.kind();
        if kind.is_value_like() && prev.is_value_like() {
            return Err(Error::parse("missing operator"));
        }
        prev = kind;

        match token {
            Token::Literal(v) => output.push(Expr::Literal(v)),
            Token::Variable(name) => output.push(Expr::Variable(name)),
            Token::Call(expr) => output.push(expr),

            Token::Unary(op) => {
                pop_stronger(&mut output, &mut operators, op.priority(), op.assoc())?;
                operators.push(OpEntry::Unary(op));
            }
            Token::Binary(op) => {
                pop_stronger(&mut output, &mut operators, op.priority(), op.assoc())?;
                operators.push(OpEntry::Binary(op));
            }

            Token::OpenParen => operators.push(OpEntry::OpenParen),
            Token::CloseParen => loop {
                match operators.pop() {
                    None => return Err(Error::parse("parenthesis mismatch: missing '('")),
                    Some(OpEntry::OpenParen) => break,
                    Some(entry) => reduce(&mut output, entry)?,
                }
            },
        }
    }

    while let Some(entry) = operators.pop() {
        if matches!(entry, OpEntry::OpenParen) {
            return Err(Error::parse("parenthesis mismatch: missing ')'"));
        }
        reduce(&mut output, entry)?;
    }

    let result = output.pop().ok_or_else(|| Error::parse("empty expression"))?;
    if !output.is_empty() {
        return Err(Error::internal("expression did not reduce to a single tree"));
    }
    Ok(result)
}

// ─── Operator stack ──────────────────────────────────────────────────────────

enum OpEntry {
    Unary(UnaryOp),
    Binary(BinaryOp),
    OpenParen,
}

impl OpEntry {
    /// Open parentheses never take part in priority comparisons.
    fn priority(&self) -> u8 {
        match self {
            Self::Unary(op) => op.priority(),
            Self::Binary(op) => op.priority(),
            Self::OpenParen => 0,
        }
    }
}

/// Pop and reduce every stacked operator that binds at least as tightly as
/// the incoming one (priorities are lower-binds-tighter; right-associative
/// operators yield to equal priority).
fn pop_stronger(
    output: &mut Vec<Expr>,
    operators: &mut Vec<OpEntry>,
    priority: u8,
    assoc: Assoc,
) -> Result<(), Error> {
    while let Some(top) = operators.last() {
        if matches!(top, OpEntry::OpenParen) {
            break;
        }
        let pops = match assoc {
            Assoc::Left => priority >= top.priority(),
            Assoc::Right => priority > top.priority(),
        };
        if !pops {
            break;
        }
        let entry = operators.pop().ok_or_else(|| Error::internal("operator stack underflow"))?;
        reduce(output, entry)?;
    }
    Ok(())
}

/// Complete an operator by popping its operands off the output stack and
/// push the finished node back. The second-popped node is the lhs.
fn reduce(output: &mut Vec<Expr>, entry: OpEntry) -> Result<(), Error> {
    match entry {
        OpEntry::Unary(op) => {
            let child = output.pop().ok_or_else(|| {
                Error::parse(format!("too few arguments for unary operator '{}'", op.sign()))
            })?;
            output.push(Expr::Unary { op, child: Box::new(child) });
        }
        OpEntry::Binary(op) => {
            let (Some(rhs), Some(lhs)) = (output.pop(), output.pop()) else {
                return Err(Error::parse(format!(
                    "too few arguments for binary operator '{}'",
                    op.sign()
                )));
            };
            output.push(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) });
        }
        OpEntry::OpenParen => {
            return Err(Error::internal("open parenthesis reduced as operator"));
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
