//! Drives one `SELECT`: relation resolution (including view inlining),
//! the optional join, filtering, projection or aggregation, `DISTINCT`,
//! `ORDER BY`, and `UNION` (spec §4.5).

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::ast::{
    CompareOp, CompareValue, Literal, OrderByItem, OrderDirection, SelectColumn, SelectStatement,
    WhereExpr,
};
use crate::error::{EngineError, Result};
use crate::predicate::Predicate;
use crate::schema::Schema;
use crate::session::Session;

use super::{aggregate, join, SessionSubqueryRunner};

/// Runs `stmt` to completion and returns its column headers and rows,
/// ordered against the pre-projection schema, then projected (or
/// aggregated), deduplicated, and unioned.
pub(crate) fn execute_select(session: &mut Session, stmt: &SelectStatement) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let (schema, mut rows) = execute_relation(session, stmt)?;

    if !stmt.order_by.is_empty() {
        rows = order_rows(&schema, rows, &stmt.order_by)?;
    }

    let is_aggregate = stmt
        .columns
        .iter()
        .any(|c| matches!(c, SelectColumn::Aggregate(..)));
    if is_aggregate
        && !stmt
            .columns
            .iter()
            .all(|c| matches!(c, SelectColumn::Aggregate(..)))
    {
        return Err(EngineError::Arity(
            "cannot select aggregate and non-aggregate columns together".into(),
        ));
    }

    let (columns, mut out_rows) = if is_aggregate {
        aggregate::compute(&schema, &rows, &stmt.columns)?
    } else {
        project(&schema, &rows, &stmt.columns)?
    };

    if stmt.distinct {
        out_rows = dedupe_preserve_order(out_rows);
    }

    if let Some(union_stmt) = &stmt.union {
        let (union_columns, union_rows) = execute_select(session, union_stmt)?;
        if union_columns.len() != columns.len() {
            return Err(EngineError::Arity(format!(
                "UNION column count mismatch: {} left vs {} right",
                columns.len(),
                union_columns.len()
            )));
        }
        out_rows.extend(union_rows);
        out_rows = dedupe_preserve_order(out_rows);
    }

    Ok((columns, out_rows))
}

/// Resolves the `FROM` list (inlining a view if it names exactly one),
/// runs the join when there is more than one table, and applies whatever
/// predicate is left over after join-key extraction.
fn execute_relation(session: &mut Session, stmt: &SelectStatement) -> Result<(Schema, Vec<Vec<String>>)> {
    let (tables, where_clause) = resolve_tables(session, stmt)?;

    let (schema, rows, residual) = if tables.len() == 1 {
        let table = session.db().open_table(&tables[0])?;
        (table.schema.clone(), table.read_rows()?, where_clause)
    } else {
        join::execute_join(session, &tables, where_clause)?
    };

    let rows = match residual {
        Some(expr) => {
            let predicate = Predicate::compile(&expr, &schema);
            let mut runner = SessionSubqueryRunner { session };
            let mut kept = Vec::with_capacity(rows.len());
            for row in rows {
                if predicate.eval(&row, &mut runner)? {
                    kept.push(row);
                }
            }
            kept
        }
        None => rows,
    };

    Ok((schema, rows))
}

/// `SELECT ... FROM viewname` is rewritten into the view's underlying
/// table list, with its saved join clauses folded into the `WHERE`
/// clause as plain equalities — the same shape the join step already
/// knows how to consume (spec §3, §4.5).
fn resolve_tables(session: &Session, stmt: &SelectStatement) -> Result<(Vec<String>, Option<WhereExpr>)> {
    if stmt.tables.len() == 1 && session.db().view_exists(&stmt.tables[0]) {
        let spec = session.db().load_view(&stmt.tables[0])?;
        let tables = spec.tables();
        let mut join_expr = None;
        for join_clause in &spec.joins {
            let clause = WhereExpr::Compare(
                CompareValue::Literal(Literal::Bareword(join_clause.left_column.clone())),
                CompareOp::Eq,
                CompareValue::Literal(Literal::Bareword(join_clause.right_column.clone())),
            );
            join_expr = Some(match join_expr {
                Some(existing) => WhereExpr::And(Box::new(existing), Box::new(clause)),
                None => clause,
            });
        }
        let where_clause = match (join_expr, stmt.where_clause.clone()) {
            (Some(j), Some(w)) => Some(WhereExpr::And(Box::new(j), Box::new(w))),
            (Some(j), None) => Some(j),
            (None, w) => w,
        };
        Ok((tables, where_clause))
    } else {
        Ok((stmt.tables.clone(), stmt.where_clause.clone()))
    }
}

fn project(schema: &Schema, rows: &[Vec<String>], spec: &[SelectColumn]) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut indices = Vec::new();
    for col in spec {
        match col {
            SelectColumn::Star => {
                for (i, column) in schema.columns().iter().enumerate() {
                    indices.push((column.name.clone(), i));
                }
            }
            SelectColumn::Column(name) => {
                let idx = schema
                    .lookup(name)
                    .ok_or_else(|| EngineError::NotFound(format!("column {name}")))?;
                indices.push((name.clone(), idx));
            }
            SelectColumn::Aggregate(..) => unreachable!("caller routes aggregates separately"),
        }
    }
    let headers = indices.iter().map(|(name, _)| name.clone()).collect();
    let projected = rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|(_, idx)| row.get(*idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Ok((headers, projected))
}

fn dedupe_preserve_order(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.clone()) {
            out.push(row);
        }
    }
    out
}

fn order_rows(schema: &Schema, mut rows: Vec<Vec<String>>, order_by: &[OrderByItem]) -> Result<Vec<Vec<String>>> {
    let mut keys = Vec::with_capacity(order_by.len());
    for item in order_by {
        let idx = schema
            .lookup(&item.column)
            .ok_or_else(|| EngineError::NotFound(format!("column {}", item.column)))?;
        keys.push((idx, item.numeric, item.direction));
    }
    rows.sort_by(|a, b| {
        for (idx, numeric, direction) in &keys {
            let (x, y) = (&a[*idx], &b[*idx]);
            let mut ord = if *numeric {
                match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                    (Ok(fx), Ok(fy)) => fx.partial_cmp(&fy).unwrap_or(Ordering::Equal),
                    _ => x.cmp(y),
                }
            } else {
                x.cmp(y)
            };
            if *direction == OrderDirection::Desc {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(rows)
}
