//! Parses `INSERT INTO name VALUES ( v1 v2 … )` (spec §4.6).

use crate::ast::InsertStatement;
use crate::error::Result;
use crate::lexer::Keyword;

use super::cursor::Cursor;

pub(crate) fn parse_insert(cursor: &mut Cursor<'_>) -> Result<InsertStatement> {
    cursor.expect_keyword(Keyword::Insert)?;
    cursor.expect_keyword(Keyword::Into)?;
    let table = cursor.ident()?;
    cursor.expect_keyword(Keyword::Values)?;
    cursor.expect_lparen()?;
    let mut values = Vec::new();
    while !cursor.at_rparen() {
        values.push(cursor.literal()?);
    }
    cursor.expect_rparen()?;
    Ok(InsertStatement { table, values })
}
