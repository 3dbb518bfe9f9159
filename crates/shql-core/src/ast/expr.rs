//! WHERE-clause expression types.
//!
//! These are produced by the parser and consumed by
//! [`crate::predicate`], which resolves [`Literal::Bareword`] against a
//! table's schema and compiles the tree into a callable predicate.

use super::statement::SelectStatement;

/// A single value token on either side of a comparison.
///
/// The parser does not know, at parse time, whether a bareword names a
/// column or stands for itself as a literal — that depends on the schema
/// of whichever table the predicate ends up compiled against. Only a
/// quoted token is unambiguously a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An unquoted word: an identifier if it resolves against the active
    /// schema, otherwise a string literal equal to its own text.
    Bareword(String),
    /// A quoted string, with delimiters already stripped.
    Quoted(String),
}

impl Literal {
    /// The text of the literal, independent of whether it was quoted.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Bareword(s) | Self::Quoted(s) => s,
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One operand of a comparison: a literal token, or a scalar subquery
/// (spec §4.5: "a subquery appears ... as a scalar on the right-hand side
/// of a comparison", demonstrated unparenthesized in spec §8 Scenario E).
#[derive(Debug, Clone, PartialEq)]
pub enum CompareValue {
    Literal(Literal),
    Subquery(Box<SelectStatement>),
}

/// A parsed WHERE clause, before schema resolution.
///
/// Grammar (see spec §4.3, extended per §4.5's scalar-subquery prose):
///
/// ```text
/// expr      := term (('and'|'or') term)*
/// term      := 'not'? primary
/// primary   := '(' expr ')' | value op value | value ['not'] 'in' subquery
/// value     := identifier | number | quoted-string | subquery
/// ```
///
/// Parentheses group a nested `expr`, not a `value`; a value is always a
/// single bareword, quoted token, or scalar subquery.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereExpr {
    And(Box<WhereExpr>, Box<WhereExpr>),
    Or(Box<WhereExpr>, Box<WhereExpr>),
    Not(Box<WhereExpr>),
    Compare(CompareValue, CompareOp, CompareValue),
    In {
        value: Literal,
        negated: bool,
        subquery: Box<SelectStatement>,
    },
}
