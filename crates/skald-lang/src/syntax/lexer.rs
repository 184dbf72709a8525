//! Byte-cursor tokenizer. Identifier classification needs the environment
//! (function vs. variable namespaces), so tokens are pulled one at a time by
//! the parser rather than produced up front.

use crate::error::Error;
use crate::runtime::env::Environment;
use crate::runtime::value::Value;
use crate::syntax::ast::{BinaryOp, UnaryOp};
use crate::syntax::resolve;
use crate::syntax::token::{Token, TokenKind};
use crate::types::{self, VariableType};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0 }
    }

    /// The next token, or `None` at end of input. `prev` is the kind of the
    /// previously produced token (the parser seeds it as an open parenthesis
    /// at the start of input) — `-` is unary exactly when `prev` still
    /// expects an operand.
    pub fn next_token(
        &mut self,
        prev: TokenKind,
        env: &mut Environment,
    ) -> Result<Option<Token>, Error> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Ok(None);
        }

        let ch = self.advance();
        let token = match ch {
            b'(' => Token::OpenParen,
            b')' => Token::CloseParen,

            b'+' => Token::Binary(BinaryOp::Add),
            b'*' => Token::Binary(BinaryOp::Mul),
            b'/' => Token::Binary(BinaryOp::Div),
            b'%' => Token::Binary(BinaryOp::Mod),
            b'^' => Token::Binary(BinaryOp::Pow),
            b'&' => Token::Binary(BinaryOp::And),
            b'|' => Token::Binary(BinaryOp::Or),

            b'-' => {
                if prev.expects_operand() {
                    Token::Unary(UnaryOp::Neg)
                } else {
                    Token::Binary(BinaryOp::Sub)
                }
            }

            b'>' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::Binary(BinaryOp::Geq)
                } else {
                    Token::Binary(BinaryOp::Gt)
                }
            }
            b'<' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::Binary(BinaryOp::Leq)
                } else {
                    Token::Binary(BinaryOp::Lt)
                }
            }
            b'!' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::Binary(BinaryOp::Neq)
                } else {
                    Token::Unary(UnaryOp::Not)
                }
            }
            b'=' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::Binary(BinaryOp::Eq)
                } else {
                    Token::Binary(BinaryOp::Assign)
                }
            }

            b'"' => Token::Literal(Value::Str(self.read_string()?)),
            b'0'..=b'9' => Token::Literal(self.read_number(ch)?),
            b'a'..=b'z' | b'A'..=b'Z' => return self.read_identifier(ch, env).map(Some),

            other => {
                return Err(Error::lex(format!("invalid sign '{}'", other as char)));
            }
        };
        Ok(Some(token))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Scans to the next `"` with no escape interpretation.
    fn read_string(&mut self) -> Result<String, Error> {
        let start = self.pos;
        while !self.is_at_end() {
            if self.advance() == b'"' {
                return Ok(self.slice(start, self.pos - 1));
            }
        }
        Err(Error::lex("unterminated string expression"))
    }

    /// Digits scan as a decimal integer; a following `.` continues the scan
    /// as a float whose value is the integer part plus the fractional part.
    fn read_number(&mut self, first: u8) -> Result<Value, Error> {
        let start = self.pos - 1;
        debug_assert!(first.is_ascii_digit());
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        let digits = self.slice(start, self.pos);
        let int_part: i32 = digits
            .parse()
            .map_err(|_| Error::lex(format!("invalid number literal '{digits}'")))?;

        if self.peek() != b'.' {
            return Ok(Value::Int(int_part));
        }

        self.advance();
        let frac_start = self.pos;
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        let frac = if self.pos == frac_start {
            0.0
        } else {
            // always parses: "0." + digit run
            format!("0.{}", self.slice(frac_start, self.pos)).parse().unwrap_or(0.0)
        };
        Ok(Value::Float(int_part as f32 + frac))
    }

    /// Identifier resolution, in order: reserved keywords, boolean literals,
    /// the cast clause, the function namespace, the variable namespace.
    fn read_identifier(&mut self, first: u8, env: &mut Environment) -> Result<Token, Error> {
        let start = self.pos - 1;
        debug_assert!(first.is_ascii_alphabetic());
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            self.pos += 1;
        }
        let word = self.slice(start, self.pos);

        if types::is_keyword(&word) {
            return Err(Error::lex(format!(
                "the keyword '{word}' can not be used as an identifier"
            )));
        }
        if word == "true" {
            return Ok(Token::Literal(Value::Bool(true)));
        }
        if word == "false" {
            return Ok(Token::Literal(Value::Bool(false)));
        }
        if word == "cast" {
            return Ok(Token::Unary(UnaryOp::Cast(self.read_cast_type()?)));
        }
        if env.has_function(&word) {
            return resolve::resolve_call(&word, self, env).map(Token::Call);
        }
        if env.is_bound(&word) {
            return Ok(Token::Variable(word));
        }
        Err(Error::lex(format!("found unknown identifier: '{word}'")))
    }

    /// The `<typename>` clause directly after the `cast` keyword.
    fn read_cast_type(&mut self) -> Result<VariableType, Error> {
        if self.peek() != b'<' {
            return Err(Error::lex(format!(
                "invalid cast syntax, expected '<' got '{}'. usage: cast<type> value",
                self.peek() as char
            )));
        }
        self.advance();

        let start = self.pos;
        while !self.is_at_end() && self.peek().is_ascii_alphabetic() {
            self.pos += 1;
        }
        let name = self.slice(start, self.pos);
        let ty = VariableType::from_name(&name)
            .ok_or_else(|| Error::lex(format!("invalid type name: {name}")))?;
        if ty == VariableType::Void {
            return Err(Error::lex("unable to cast to: void"));
        }

        if self.peek() != b'>' {
            return Err(Error::lex(format!(
                "invalid cast syntax, expected '>' got '{}'. usage: cast<type> value",
                self.peek() as char
            )));
        }
        self.advance();
        Ok(ty)
    }

    /// Reads the parenthesized, comma-separated argument list of a call.
    /// Splits only at top-level commas; nested parentheses are respected,
    /// string contents are not (the splitter is purely lexical).
    /// An empty list comes back as one empty-string argument.
    pub(crate) fn read_call_arguments(&mut self, name: &str) -> Result<Vec<String>, Error> {
        self.skip_whitespace();
        if self.is_at_end() || self.advance() != b'(' {
            return Err(Error::parse(format!(
                "expected opening parenthesis '(' after function identifier: '{name}'"
            )));
        }

        let mut depth = 1u32;
        let mut arguments = Vec::new();
        self.skip_whitespace();
        let mut seg_start = self.pos;

        while !self.is_at_end() {
            let ch = self.advance();
            match ch {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        arguments.push(self.slice(seg_start, self.pos - 1));
                        return Ok(arguments);
                    }
                }
                b',' if depth == 1 => {
                    arguments.push(self.slice(seg_start, self.pos - 1));
                    self.skip_whitespace();
                    seg_start = self.pos;
                }
                _ => {}
            }
        }

        Err(Error::parse(format!(
            "expected closing parenthesis ')' after function identifier: '{name}'"
        )))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        let mut env = Environment::new();
        lex_in(src, &mut env)
    }

    fn lex_in(src: &str, env: &mut Environment) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut prev = TokenKind::OpenParen;
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next_token(prev, env).expect("lex failed") {
            prev = tok.kind();
            tokens.push(tok);
        }
        tokens
    }

    fn lex_err(src: &str) -> Error {
        let mut env = Environment::new();
        let mut lexer = Lexer::new(src);
        let mut prev = TokenKind::OpenParen;
        loop {
            match lexer.next_token(prev, &mut env) {
                Ok(Some(tok)) => prev = tok.kind(),
                Ok(None) => panic!("expected a lex error for {src:?}"),
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn empty_input() {
        assert!(lex("   ").is_empty());
    }

    #[test]
    fn integer_literal() {
        match &lex("42")[..] {
            [Token::Literal(Value::Int(42))] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn float_literal_combines_parts_additively() {
        match &lex("12.5")[..] {
            [Token::Literal(Value::Float(v))] => assert_eq!(*v, 12.5),
            other => panic!("unexpected tokens: {other:?}"),
        }
        // a bare trailing dot contributes nothing
        match &lex("5.")[..] {
            [Token::Literal(Value::Float(v))] => assert_eq!(*v, 5.0),
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn minus_classification() {
        // after an open parenthesis (or at the start): unary
        match &lex("-5")[..] {
            [Token::Unary(UnaryOp::Neg), Token::Literal(Value::Int(5))] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        // after a value: binary; after another binary operator: unary again
        match &lex("5--3")[..] {
            [
                Token::Literal(Value::Int(5)),
                Token::Binary(BinaryOp::Sub),
                Token::Unary(UnaryOp::Neg),
                Token::Literal(Value::Int(3)),
            ] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn two_char_operators_and_their_prefixes() {
        match &lex("1==2")[..] {
            [_, Token::Binary(BinaryOp::Eq), _] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        match &lex("1>=2")[..] {
            [_, Token::Binary(BinaryOp::Geq), _] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        match &lex("1>2")[..] {
            [_, Token::Binary(BinaryOp::Gt), _] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        match &lex("1!=2")[..] {
            [_, Token::Binary(BinaryOp::Neq), _] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        match &lex("!true")[..] {
            [Token::Unary(UnaryOp::Not), Token::Literal(Value::Bool(true))] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn string_literal_no_escapes() {
        match &lex(r#""hello world""#)[..] {
            [Token::Literal(Value::Str(s))] => assert_eq!(s, "hello world"),
            other => panic!("unexpected tokens: {other:?}"),
        }
        match &lex(r#""a\b""#)[..] {
            [Token::Literal(Value::Str(s))] => assert_eq!(s, r"a\b"),
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(lex_err(r#""oops"#), Error::Lex("unterminated string expression".into()));
    }

    #[test]
    fn bool_literals() {
        match &lex("true false")[..] {
            [Token::Literal(Value::Bool(true)), Token::Literal(Value::Bool(false))] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn cast_clause() {
        match &lex("cast<int>")[..] {
            [Token::Unary(UnaryOp::Cast(VariableType::Int))] => {}
            other => panic!("unexpected tokens: {other:?}"),
        }
        assert!(matches!(lex_err("cast int>"), Error::Lex(_)));
        assert!(matches!(lex_err("cast<quaternion>"), Error::Lex(_)));
        assert!(matches!(lex_err("cast<void>"), Error::Lex(_)));
    }

    #[test]
    fn keyword_is_rejected_as_identifier() {
        assert_eq!(
            lex_err("trigger"),
            Error::Lex("the keyword 'trigger' can not be used as an identifier".into())
        );
        assert!(matches!(lex_err("int"), Error::Lex(_)));
    }

    #[test]
    fn unknown_identifier() {
        assert_eq!(lex_err("nope"), Error::Lex("found unknown identifier: 'nope'".into()));
    }

    #[test]
    fn bound_variable_resolves() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        match &lex_in("x", &mut env)[..] {
            [Token::Variable(name)] => assert_eq!(name, "x"),
            other => panic!("unexpected tokens: {other:?}"),
        }
    }

    #[test]
    fn invalid_sign() {
        assert_eq!(lex_err("#"), Error::Lex("invalid sign '#'".into()));
    }

    #[test]
    fn call_argument_splitting() {
        let mut lexer = Lexer::new("(a, g(b, c), 1+2)");
        let args = lexer.read_call_arguments("f").expect("split failed");
        assert_eq!(args, vec!["a", "g(b, c)", "1+2"]);
    }

    #[test]
    fn call_argument_splitting_empty_list() {
        let mut lexer = Lexer::new("()");
        assert_eq!(lexer.read_call_arguments("f").expect("split failed"), vec![""]);
    }

    #[test]
    fn call_argument_splitting_errors() {
        assert!(matches!(
            Lexer::new("1, 2)").read_call_arguments("f"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            Lexer::new("(1, 2").read_call_arguments("f"),
            Err(Error::Parse(_))
        ));
    }
}
