//! Parses `UPDATE name SET c1 = e1 [c2 = e2 …] [WHERE pred]` (spec §4.6).

use crate::ast::{Assignment, UpdateStatement};
use crate::error::{EngineError, Result};
use crate::lexer::{Keyword, Operator};

use super::cursor::Cursor;
use super::select::parse_or_expr;

pub(crate) fn parse_update(cursor: &mut Cursor<'_>) -> Result<UpdateStatement> {
    cursor.expect_keyword(Keyword::Update)?;
    let table = cursor.ident()?;
    cursor.expect_keyword(Keyword::Set)?;
    let mut assignments = Vec::new();
    loop {
        let column = cursor.ident()?;
        if !cursor.eat_op(Operator::Eq) {
            return Err(EngineError::Parse(format!(
                "expected '=' after column {column} in SET clause"
            )));
        }
        let value = cursor.literal()?;
        assignments.push(Assignment { column, value });
        if cursor.at_eof() || cursor.peek_keyword() == Some(Keyword::Where) {
            break;
        }
    }
    let where_clause = if cursor.eat_keyword(Keyword::Where) {
        Some(parse_or_expr(cursor)?)
    } else {
        None
    };
    Ok(UpdateStatement {
        table,
        assignments,
        where_clause,
    })
}
