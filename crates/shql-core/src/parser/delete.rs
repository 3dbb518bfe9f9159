//! Parses `DELETE FROM name [WHERE pred]` (spec §4.6).

use crate::ast::DeleteStatement;
use crate::error::Result;
use crate::lexer::Keyword;

use super::cursor::Cursor;
use super::select::parse_or_expr;

pub(crate) fn parse_delete(cursor: &mut Cursor<'_>) -> Result<DeleteStatement> {
    cursor.expect_keyword(Keyword::Delete)?;
    cursor.expect_keyword(Keyword::From)?;
    let table = cursor.ident()?;
    let where_clause = if cursor.eat_keyword(Keyword::Where) {
        Some(parse_or_expr(cursor)?)
    } else {
        None
    };
    Ok(DeleteStatement { table, where_clause })
}
