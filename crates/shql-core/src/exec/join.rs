//! Left-to-right multi-table joins over the accumulated intermediate
//! relation R (spec §4.5).
//!
//! The spec's reference implementation sorts R and T on their join keys
//! and merges; this reimplementation builds an equivalent in-memory hash
//! join instead. Row order coming out of a join is unspecified by the
//! spec either way (§5), and every table is already loaded fully into
//! memory by [`crate::storage::Table::read_rows`], so there is no
//! scratch-file working set to preserve — see DESIGN.md.

use std::collections::HashMap;

use crate::ast::{CompareOp, CompareValue, Literal, WhereExpr};
use crate::error::{EngineError, Result};
use crate::schema::Schema;
use crate::session::Session;

/// Splits a top-level conjunction into its leaves. `OR`/`NOT`/comparison
/// leaves that aren't themselves `AND` stay intact; only `AND` is
/// flattened, since only top-level equalities are eligible join keys
/// (spec §4.5 step 1).
fn flatten_and(expr: WhereExpr) -> Vec<WhereExpr> {
    match expr {
        WhereExpr::And(l, r) => {
            let mut leaves = flatten_and(*l);
            leaves.extend(flatten_and(*r));
            leaves
        }
        other => vec![other],
    }
}

fn rebuild_and(mut conjuncts: Vec<WhereExpr>) -> Option<WhereExpr> {
    if conjuncts.is_empty() {
        return None;
    }
    let first = conjuncts.remove(0);
    Some(
        conjuncts
            .into_iter()
            .fold(first, |acc, next| WhereExpr::And(Box::new(acc), Box::new(next))),
    )
}

/// Looks for a top-level `a = b` conjunct where one side names a column
/// of `r_schema` and the other names a column of `t_schema`. Returns the
/// conjunct's index and the resolved key positions.
fn find_join_key(conjuncts: &[WhereExpr], r_schema: &Schema, t_schema: &Schema) -> Option<(usize, usize, usize)> {
    for (i, conjunct) in conjuncts.iter().enumerate() {
        let WhereExpr::Compare(
            CompareValue::Literal(Literal::Bareword(a)),
            CompareOp::Eq,
            CompareValue::Literal(Literal::Bareword(b)),
        ) = conjunct
        else {
            continue;
        };
        if let (Some(r_idx), Some(t_idx)) = (r_schema.lookup(a), t_schema.lookup(b)) {
            return Some((i, r_idx, t_idx));
        }
        if let (Some(t_idx), Some(r_idx)) = (t_schema.lookup(a), r_schema.lookup(b)) {
            return Some((i, r_idx, t_idx));
        }
    }
    None
}

fn hash_join(
    r_rows: Vec<Vec<String>>,
    r_key: usize,
    t_rows: &[Vec<String>],
    t_key: usize,
) -> Vec<Vec<String>> {
    let mut buckets: HashMap<&str, Vec<&Vec<String>>> = HashMap::new();
    for row in t_rows {
        buckets.entry(row[t_key].as_str()).or_default().push(row);
    }
    let mut out = Vec::new();
    for r in &r_rows {
        if let Some(matches) = buckets.get(r[r_key].as_str()) {
            for t in matches {
                let mut combined = r.clone();
                combined.extend(t.iter().cloned());
                out.push(combined);
            }
        }
    }
    out
}

/// Executes the left-to-right join over `tables`, consuming equi-join
/// conjuncts out of `where_clause` as it goes.
///
/// # Errors
/// [`EngineError::JoinOrder`] if some table in the list cannot be
/// connected to the accumulated relation by an equality conjunct already
/// present in the `WHERE` clause (spec §4.5 step 2).
pub(crate) fn execute_join(
    session: &Session,
    tables: &[String],
    where_clause: Option<WhereExpr>,
) -> Result<(Schema, Vec<Vec<String>>, Option<WhereExpr>)> {
    let mut names = tables.iter();
    let first_name = names.next().expect("caller guarantees at least one table");
    let first = session.db().open_table(first_name)?;
    let mut r_schema = first.schema.clone();
    let mut r_rows = first.read_rows()?;
    let mut conjuncts = where_clause.map(flatten_and).unwrap_or_default();

    for name in names {
        let t_table = session.db().open_table(name)?;
        let t_schema = t_table.schema.clone();
        let t_rows = t_table.read_rows()?;
        let (conjunct_idx, r_key, t_key) =
            find_join_key(&conjuncts, &r_schema, &t_schema).ok_or(EngineError::JoinOrder)?;
        conjuncts.remove(conjunct_idx);
        r_rows = hash_join(r_rows, r_key, &t_rows, t_key);
        r_schema = Schema::new(
            r_schema
                .columns()
                .iter()
                .chain(t_schema.columns())
                .cloned()
                .collect(),
        );
    }

    Ok((r_schema, r_rows, rebuild_and(conjuncts)))
}
