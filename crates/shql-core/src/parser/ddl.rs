//! Parses the four data-definition statements (spec §4.6).

use crate::ast::{ColumnDef, CreateTableStatement, CreateViewStatement, DropTableStatement, DropViewStatement, ViewJoin};
use crate::error::{EngineError, Result};
use crate::lexer::{Keyword, Operator};

use super::cursor::Cursor;

/// `CREATE TABLE name ( col width [col width …] )`.
pub(crate) fn parse_create_table(cursor: &mut Cursor<'_>) -> Result<CreateTableStatement> {
    cursor.expect_keyword(Keyword::Create)?;
    cursor.expect_keyword(Keyword::Table)?;
    let table = cursor.ident()?;
    cursor.expect_lparen()?;
    let mut columns = Vec::new();
    while !cursor.at_rparen() {
        let name = cursor.ident()?;
        let width_text = cursor.ident()?;
        let width: u32 = width_text.parse().map_err(|_| {
            EngineError::Parse(format!("column width '{width_text}' is not a number"))
        })?;
        columns.push(ColumnDef { name, width });
    }
    cursor.expect_rparen()?;
    if columns.is_empty() {
        return Err(EngineError::Parse(
            "CREATE TABLE requires at least one column".into(),
        ));
    }
    Ok(CreateTableStatement { table, columns })
}

/// `DROP TABLE name`.
pub(crate) fn parse_drop_table(cursor: &mut Cursor<'_>) -> Result<DropTableStatement> {
    cursor.expect_keyword(Keyword::Drop)?;
    cursor.expect_keyword(Keyword::Table)?;
    let table = cursor.ident()?;
    Ok(DropTableStatement { table })
}

/// `CREATE VIEW name ( t1.k = t2.k [, …] )`.
pub(crate) fn parse_create_view(cursor: &mut Cursor<'_>) -> Result<CreateViewStatement> {
    cursor.expect_keyword(Keyword::Create)?;
    cursor.expect_keyword(Keyword::View)?;
    let view = cursor.ident()?;
    cursor.expect_lparen()?;
    let mut joins = Vec::new();
    while !cursor.at_rparen() {
        let left_table = cursor.ident()?;
        cursor.expect_dot()?;
        let left_column = cursor.ident()?;
        if !cursor.eat_op(Operator::Eq) {
            return Err(EngineError::Parse(
                "expected '=' in view join clause".into(),
            ));
        }
        let right_table = cursor.ident()?;
        cursor.expect_dot()?;
        let right_column = cursor.ident()?;
        joins.push(ViewJoin {
            left_table,
            left_column,
            right_table,
            right_column,
        });
    }
    cursor.expect_rparen()?;
    if joins.is_empty() {
        return Err(EngineError::Parse(
            "CREATE VIEW requires at least one join clause".into(),
        ));
    }
    Ok(CreateViewStatement { view, joins })
}

/// `DROP VIEW name`.
pub(crate) fn parse_drop_view(cursor: &mut Cursor<'_>) -> Result<DropViewStatement> {
    cursor.expect_keyword(Keyword::Drop)?;
    cursor.expect_keyword(Keyword::View)?;
    let view = cursor.ident()?;
    Ok(DropViewStatement { view })
}
