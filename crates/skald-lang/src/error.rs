use thiserror::Error;

/// Every failure the language core can produce.
///
/// One variant per category so hosts (and tests) can tell failure classes
/// apart; the payload is always a human-readable message. No error is
/// recoverable for the `parse`/`evaluate` call in progress — the core
/// propagates outward and leaves reporting to the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Lexical: unterminated string, invalid leading character, malformed
    /// cast clause, unknown or reserved identifier.
    #[error("lex error: {0}")]
    Lex(String),

    /// Structural: parenthesis mismatch, missing operator/operand,
    /// assignment target not a variable.
    #[error("parse error: {0}")]
    Parse(String),

    /// Operator applied to incompatible operand types, or an impossible cast.
    #[error("type error: {0}")]
    Type(String),

    /// No matching or ambiguous function candidates. The message carries the
    /// evaluated argument types and the full candidate signature list.
    #[error("{0}")]
    Overload(String),

    /// Environment-level runtime failure: unbound variable, unknown function id.
    #[error("eval error: {0}")]
    Eval(String),

    /// An invariant the parser is supposed to guarantee did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn lex(message: impl Into<String>) -> Self {
        Self::Lex(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub fn overload(message: impl Into<String>) -> Self {
        Self::Overload(message.into())
    }

    pub fn eval(message: impl Into<String>) -> Self {
        Self::Eval(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
