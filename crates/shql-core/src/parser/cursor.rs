//! A minimal token cursor shared by every statement parser.

use crate::ast::Literal;
use crate::error::{EngineError, Result};
use crate::lexer::{Keyword, Operator, Token, TokenKind};

/// Strips the opening/closing quote a [`TokenKind::QuotedString`] keeps
/// around its text.
fn strip_quotes(s: &str) -> String {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// Walks a token slice left to right with one token of lookahead.
///
/// Keywords are unreserved (spec §4.1): wherever the grammar expects an
/// identifier, [`Cursor::ident`] accepts a keyword token too and yields
/// its canonical spelling.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token at the current position. The slice always ends in
    /// [`TokenKind::Eof`], so this never runs past the end.
    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead of the current one, clamped to the
    /// trailing [`TokenKind::Eof`] if `n` runs past the end.
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .unwrap_or_else(|| self.tokens.last().expect("token stream always has Eof"))
    }

    pub(crate) fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().as_keyword()
    }

    pub(crate) fn peek_nth_keyword(&self, n: usize) -> Option<Keyword> {
        self.peek_nth(n).as_keyword()
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it is keyword `kw`.
    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword() == Some(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(EngineError::Parse(format!(
                "expected '{}', found {:?}",
                kw.as_str(),
                self.peek().kind
            )))
        }
    }

    pub(crate) fn expect_lparen(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::LParen) {
            self.advance();
            Ok(())
        } else {
            Err(EngineError::Parse(format!(
                "expected '(', found {:?}",
                self.peek().kind
            )))
        }
    }

    pub(crate) fn expect_rparen(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::RParen) {
            self.advance();
            Ok(())
        } else {
            Err(EngineError::Parse(format!(
                "expected ')', found {:?}",
                self.peek().kind
            )))
        }
    }

    pub(crate) fn eat_lparen(&mut self) -> bool {
        if matches!(self.peek().kind, TokenKind::LParen) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn at_rparen(&self) -> bool {
        matches!(self.peek().kind, TokenKind::RParen)
    }

    /// Consumes a `*` token if present.
    pub(crate) fn eat_star(&mut self) -> bool {
        if matches!(self.peek().kind, TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_op(&mut self, op: Operator) -> bool {
        if matches!(self.peek().kind, TokenKind::Op(o) if o == op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_dot(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::Dot) {
            self.advance();
            Ok(())
        } else {
            Err(EngineError::Parse(format!(
                "expected '.', found {:?}",
                self.peek().kind
            )))
        }
    }

    /// Consumes one identifier-shaped token: a bareword, or a keyword used
    /// as a name (keywords are unreserved, spec §4.1).
    pub(crate) fn ident(&mut self) -> Result<String> {
        match self.advance().kind {
            TokenKind::Word(s) => Ok(s),
            TokenKind::Keyword(kw) => Ok(kw.as_str().to_string()),
            other => Err(EngineError::Parse(format!(
                "expected an identifier, found {other:?}"
            ))),
        }
    }

    /// Consumes one comparison operator.
    pub(crate) fn comparison_op(&mut self) -> Result<Operator> {
        match self.advance().kind {
            TokenKind::Op(op @ (Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge)) => {
                Ok(op)
            }
            other => Err(EngineError::Parse(format!(
                "expected a comparison operator, found {other:?}"
            ))),
        }
    }

    /// Consumes one value token: a quoted string, or a bareword (which may
    /// turn out to be a column reference or a literal once resolved
    /// against a schema — see [`crate::predicate`]).
    pub(crate) fn literal(&mut self) -> Result<Literal> {
        match self.advance().kind {
            TokenKind::QuotedString(s) => Ok(Literal::Quoted(strip_quotes(&s))),
            TokenKind::Word(s) => Ok(Literal::Bareword(s)),
            TokenKind::Keyword(kw) => Ok(Literal::Bareword(kw.as_str().to_string())),
            other => Err(EngineError::Parse(format!(
                "expected a value, found {other:?}"
            ))),
        }
    }
}
