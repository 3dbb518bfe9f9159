//! The executor: turns a parsed [`Statement`] into table mutations or a
//! result set (spec §4.5, §4.6).

mod aggregate;
mod join;
mod mutate;
mod select;

use crate::ast::{SelectColumn, SelectStatement, Statement};
use crate::error::Result;
use crate::predicate::SubqueryRunner;
use crate::session::Session;
use crate::view::ViewSpec;

/// The outcome of running one statement, shaped for external rendering.
pub enum ExecResult {
    /// A `SELECT`: column headers plus projected rows, rendered
    /// TAB-joined (spec §4.5).
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// `print name`: the table's full contents, plus each column's
    /// declared display width so the caller can column-pad instead of
    /// TAB-joining (spec §4.5, §1 "print table" is presentational only).
    Printed {
        columns: Vec<String>,
        widths: Vec<u32>,
        rows: Vec<Vec<String>>,
    },
    /// `INSERT`/`UPDATE`/`DELETE`: rows affected.
    RowCount(usize),
    /// `CREATE`/`DROP TABLE`/`VIEW`: no rows, no count.
    Done,
    /// `help`.
    Help,
}

/// Executes one already-parsed statement against `session`.
///
/// # Errors
/// Propagates whatever the statement's own execution path failed with.
pub fn execute(session: &mut Session, statement: &Statement) -> Result<ExecResult> {
    match statement {
        Statement::Select(stmt) => {
            let (columns, rows) = select::execute_select(session, stmt)?;
            Ok(ExecResult::Rows { columns, rows })
        }
        Statement::Insert(stmt) => mutate::execute_insert(session, stmt).map(ExecResult::RowCount),
        Statement::Update(stmt) => mutate::execute_update(session, stmt).map(ExecResult::RowCount),
        Statement::Delete(stmt) => mutate::execute_delete(session, stmt).map(ExecResult::RowCount),
        Statement::CreateTable(stmt) => {
            session.db().create_table(&stmt.table, &stmt.columns)?;
            Ok(ExecResult::Done)
        }
        Statement::DropTable(stmt) => {
            session.db().drop_table(&stmt.table)?;
            Ok(ExecResult::Done)
        }
        Statement::CreateView(stmt) => {
            let spec = ViewSpec {
                joins: stmt.joins.clone(),
            };
            session.db().create_view(&stmt.view, &spec)?;
            Ok(ExecResult::Done)
        }
        Statement::DropView(stmt) => {
            session.db().drop_view(&stmt.view)?;
            Ok(ExecResult::Done)
        }
        Statement::Help => Ok(ExecResult::Help),
        Statement::Print(name) => {
            let widths = session
                .db()
                .open_table(name)?
                .schema
                .columns()
                .iter()
                .map(|c| c.width)
                .collect();
            let as_select = SelectStatement {
                distinct: false,
                columns: vec![SelectColumn::Star],
                tables: vec![name.clone()],
                where_clause: None,
                order_by: Vec::new(),
                union: None,
            };
            let (columns, rows) = select::execute_select(session, &as_select)?;
            Ok(ExecResult::Printed { columns, widths, rows })
        }
    }
}

/// Bridges the predicate compiler's lazy subquery evaluation back into
/// the executor: a scalar or `IN` subquery is itself a full nested
/// `SELECT`, run with the session's subselect flag set (spec §4.3, §4.5).
struct SessionSubqueryRunner<'a> {
    session: &'a mut Session,
}

impl SubqueryRunner for SessionSubqueryRunner<'_> {
    fn run(&mut self, stmt: &SelectStatement) -> Result<Vec<Vec<String>>> {
        self.session
            .with_subselect(|s| select::execute_select(s, stmt).map(|(_, rows)| rows))
    }
}
