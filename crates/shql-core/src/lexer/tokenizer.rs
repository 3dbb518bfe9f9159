//! The statement tokenizer.

use super::{Keyword, Operator, Span, Token, TokenKind};
use crate::error::{EngineError, Result};

/// Characters that terminate a bareword/number scan even though they are
/// not whitespace: the single-character tokens plus the leading
/// characters of every multi-character operator.
fn is_word_terminator(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '*' | '.' | ',' | '<' | '>' | '=' | '!' | '\'' | '"'
    )
}

/// A single-pass, hand-written tokenizer over a complete statement string.
///
/// Mirrors the teacher's `Lexer`: a `peek`/`advance` byte-position scanner
/// with no backtracking. Unlike a general SQL lexer, this one never
/// classifies a word as a number or keyword at scan time beyond keyword
/// recognition — see [`TokenKind::Word`].
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Scans the next token, discarding whitespace first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] if a quoted string is never closed.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            '\'' | '"' => self.scan_quoted_string(c),
            '(' => {
                self.advance();
                Ok(self.make_token(TokenKind::LParen))
            }
            ')' => {
                self.advance();
                Ok(self.make_token(TokenKind::RParen))
            }
            '*' => {
                self.advance();
                Ok(self.make_token(TokenKind::Star))
            }
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dot))
            }
            ',' => {
                // Commas are optional separators everywhere; discard and
                // recurse to the next real token.
                self.advance();
                self.next_token()
            }
            '<' | '>' | '=' | '!' => Ok(self.scan_operator()),
            _ => Ok(self.scan_word()),
        }
    }

    /// Tokenizes the entire input, stopping at (and including) the first
    /// [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] if any quoted string is unterminated.
    pub fn tokenize(input: &str) -> Result<Vec<Token>> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn scan_operator(&mut self) -> Token {
        let c = self.advance().expect("checked by caller");
        let op = match c {
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Operator::Le
                }
                Some('>') => {
                    self.advance();
                    Operator::Ne
                }
                _ => Operator::Lt,
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Operator::Ge
                }
                _ => Operator::Gt,
            },
            '=' => Operator::Eq,
            '!' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Operator::Ne
                }
                _ => Operator::Bang,
            },
            _ => unreachable!("scan_operator only called on <>=! "),
        };
        self.make_token(TokenKind::Op(op))
    }

    /// Scans a quoted string. The delimiters are kept in the token text;
    /// there is no escape processing (per spec).
    fn scan_quoted_string(&mut self, quote: char) -> Result<Token> {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some(_) => continue,
                None => {
                    return Err(EngineError::Parse(format!(
                        "unterminated quoted string starting at byte {}",
                        self.start
                    )));
                }
            }
        }
        let text = self.input[self.start..self.pos].to_string();
        Ok(self.make_token(TokenKind::QuotedString(text)))
    }

    /// Scans a bareword: an identifier, a number, or a keyword, all
    /// indistinguishable at lex time (see [`TokenKind::Word`]).
    fn scan_word(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !is_word_terminator(c))
        {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Word(text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_simple_select() {
        let kinds = kinds("select name from users where age > 28");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Word("name".into()),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Word("users".into()),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Word("age".into()),
                TokenKind::Op(Operator::Gt),
                TokenKind::Word("28".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn commas_are_discarded() {
        let kinds = kinds("select name, age from users");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Word("name".into()),
                TokenKind::Word("age".into()),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Word("users".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn maximal_munch_operators() {
        let kinds = kinds("a <= b <> c != d >= e < f > g = h");
        let ops: Vec<_> = kinds
            .into_iter()
            .filter_map(|k| match k {
                TokenKind::Op(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::Le,
                Operator::Ne,
                Operator::Ne,
                Operator::Ge,
                Operator::Lt,
                Operator::Gt,
                Operator::Eq,
            ]
        );
    }

    #[test]
    fn quoted_string_keeps_delimiters() {
        let kinds = kinds("'Alice'");
        assert_eq!(kinds, vec![TokenKind::QuotedString("'Alice'".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = Lexer::tokenize("select * from t where name = 'Alice").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn lone_bang_is_a_token() {
        let kinds = kinds("a ! b");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word("a".into()),
                TokenKind::Op(Operator::Bang),
                TokenKind::Word("b".into()),
                TokenKind::Eof,
            ]
        );
    }
}
