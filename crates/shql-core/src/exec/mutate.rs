//! `INSERT`/`UPDATE`/`DELETE` execution (spec §4.6).

use crate::ast::{DeleteStatement, InsertStatement, UpdateStatement};
use crate::error::{EngineError, Result};
use crate::predicate::Predicate;
use crate::session::Session;

use super::SessionSubqueryRunner;

/// `INSERT INTO name VALUES ( v1 v2 … )`. The flat value list is sliced
/// into groups of the table's column count.
///
/// # Errors
/// [`EngineError::Arity`] if the value count isn't a multiple of the
/// column count.
pub(crate) fn execute_insert(session: &mut Session, stmt: &InsertStatement) -> Result<usize> {
    let table = session.db().open_table(&stmt.table)?;
    let width = table.schema.field_count();
    if width == 0 || stmt.values.len() % width != 0 {
        return Err(EngineError::Arity("Incorrect number of values".into()));
    }
    let rows: Vec<Vec<String>> = stmt
        .values
        .chunks(width)
        .map(|chunk| chunk.iter().map(|lit| lit.text().to_string()).collect())
        .collect();
    table.append(&rows)?;
    Ok(rows.len())
}

/// `UPDATE name SET … [WHERE …]`. Whole-file rewrite (spec §4.6, §9).
pub(crate) fn execute_update(session: &mut Session, stmt: &UpdateStatement) -> Result<usize> {
    let table = session.db().open_table(&stmt.table)?;
    let schema = table.schema.clone();
    let mut assignments = Vec::with_capacity(stmt.assignments.len());
    for assignment in &stmt.assignments {
        let idx = schema.lookup(&assignment.column).ok_or_else(|| {
            EngineError::Arity(format!("unknown column {}", assignment.column))
        })?;
        assignments.push((idx, assignment.value.text().to_string()));
    }
    let rows = table.read_rows()?;
    let predicate = stmt.where_clause.as_ref().map(|e| Predicate::compile(e, &schema));
    let mut runner = SessionSubqueryRunner { session };

    let mut updated = 0usize;
    let mut out_rows = Vec::with_capacity(rows.len());
    for mut row in rows {
        let matched = match &predicate {
            Some(p) => p.eval(&row, &mut runner)?,
            None => true,
        };
        if matched {
            updated += 1;
            for (idx, value) in &assignments {
                if let Some(slot) = row.get_mut(*idx) {
                    slot.clone_from(value);
                }
            }
        }
        out_rows.push(row);
    }
    table.rewrite(&out_rows)?;
    Ok(updated)
}

/// `DELETE FROM name [WHERE …]`. Whole-file rewrite (spec §4.6, §9).
pub(crate) fn execute_delete(session: &mut Session, stmt: &DeleteStatement) -> Result<usize> {
    let table = session.db().open_table(&stmt.table)?;
    let schema = table.schema.clone();
    let rows = table.read_rows()?;
    let predicate = stmt.where_clause.as_ref().map(|e| Predicate::compile(e, &schema));
    let mut runner = SessionSubqueryRunner { session };

    let mut removed = 0usize;
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        let matched = match &predicate {
            Some(p) => p.eval(&row, &mut runner)?,
            None => true,
        };
        if matched {
            removed += 1;
        } else {
            kept.push(row);
        }
    }
    table.rewrite(&kept)?;
    Ok(removed)
}
