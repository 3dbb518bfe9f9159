//! The statement dispatcher and per-statement parsers (spec §4.4).
//!
//! [`parse_statement`] inspects the leading token(s) of an already
//! tokenized statement and routes to the matching parser, mirroring the
//! dispatch table in spec §4.4 exactly.

mod cursor;
mod ddl;
mod delete;
mod insert;
mod select;
mod update;

use crate::ast::Statement;
use crate::error::{EngineError, Result};
use crate::lexer::{Keyword, Token, TokenKind};

use cursor::Cursor;

/// Parses one complete statement from its token stream.
///
/// # Errors
/// [`EngineError::Parse`] if the leading tokens don't match any known
/// statement, or if a statement-specific parser fails partway through.
pub fn parse_statement(tokens: &[Token]) -> Result<Statement> {
    let mut cursor = Cursor::new(tokens);
    match cursor.peek_keyword() {
        Some(Keyword::Select) => Ok(Statement::Select(select::parse_select(&mut cursor)?)),
        Some(Keyword::Insert) => Ok(Statement::Insert(insert::parse_insert(&mut cursor)?)),
        Some(Keyword::Update) => Ok(Statement::Update(update::parse_update(&mut cursor)?)),
        Some(Keyword::Delete) => Ok(Statement::Delete(delete::parse_delete(&mut cursor)?)),
        Some(Keyword::Create) => match cursor.peek_nth_keyword(1) {
            Some(Keyword::Table) => Ok(Statement::CreateTable(ddl::parse_create_table(&mut cursor)?)),
            Some(Keyword::View) => Ok(Statement::CreateView(ddl::parse_create_view(&mut cursor)?)),
            _ => Err(EngineError::Parse(
                "expected 'table' or 'view' after create".into(),
            )),
        },
        Some(Keyword::Drop) => match cursor.peek_nth_keyword(1) {
            Some(Keyword::Table) => Ok(Statement::DropTable(ddl::parse_drop_table(&mut cursor)?)),
            Some(Keyword::View) => Ok(Statement::DropView(ddl::parse_drop_view(&mut cursor)?)),
            _ => Err(EngineError::Parse(
                "expected 'table' or 'view' after drop".into(),
            )),
        },
        Some(Keyword::Help) => Ok(Statement::Help),
        Some(Keyword::Print) => {
            cursor.expect_keyword(Keyword::Print)?;
            Ok(Statement::Print(cursor.ident()?))
        }
        _ => Err(EngineError::Parse(format!(
            "unknown command, starting at {:?}",
            leading_token(tokens)
        ))),
    }
}

fn leading_token(tokens: &[Token]) -> &TokenKind {
    tokens
        .first()
        .map_or(&TokenKind::Eof, |t| &t.kind)
}
