//! Whole-relation aggregates (spec §4.5). There is no `GROUP BY` (spec
//! non-goals), so an aggregate `SELECT` always produces exactly one
//! output row.

use crate::ast::{AggFunc, SelectColumn};
use crate::error::{EngineError, Result};
use crate::predicate::cmp;
use crate::schema::Schema;

const fn agg_name(func: AggFunc) -> &'static str {
    match func {
        AggFunc::Count => "count",
        AggFunc::Sum => "sum",
        AggFunc::Avg => "avg",
        AggFunc::Min => "min",
        AggFunc::Max => "max",
    }
}

/// Computes every aggregate in `spec` over `rows` and returns a single
/// output row, one value per requested aggregate, headed by
/// `func(column)`.
pub(crate) fn compute(schema: &Schema, rows: &[Vec<String>], spec: &[SelectColumn]) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut headers = Vec::with_capacity(spec.len());
    let mut values = Vec::with_capacity(spec.len());
    for col in spec {
        let SelectColumn::Aggregate(func, column) = col else {
            unreachable!("caller routes non-aggregate columns separately");
        };
        headers.push(format!("{}({column})", agg_name(*func)));
        values.push(compute_one(schema, rows, *func, column)?);
    }
    Ok((headers, vec![values]))
}

fn compute_one(schema: &Schema, rows: &[Vec<String>], func: AggFunc, column: &str) -> Result<String> {
    if matches!(func, AggFunc::Count) && column == "*" {
        return Ok(rows.len().to_string());
    }
    let idx = schema
        .lookup(column)
        .ok_or_else(|| EngineError::NotFound(format!("column {column}")))?;
    let values: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
    Ok(match func {
        // COUNT excludes empty values; SUM/AVG treat them (and anything
        // non-numeric) as zero (spec §9 open question, resolved in
        // DESIGN.md).
        AggFunc::Count => values.iter().filter(|v| !v.is_empty()).count().to_string(),
        AggFunc::Sum => format_number(values.iter().map(|v| as_number(v)).sum()),
        AggFunc::Avg => {
            if values.is_empty() {
                "0".to_string()
            } else {
                let sum: f64 = values.iter().map(|v| as_number(v)).sum();
                format_number(sum / values.len() as f64)
            }
        }
        AggFunc::Min => values
            .iter()
            .copied()
            .min_by(|a, b| cmp(a, b))
            .unwrap_or_default()
            .to_string(),
        AggFunc::Max => values
            .iter()
            .copied()
            .max_by(|a, b| cmp(a, b))
            .unwrap_or_default()
            .to_string(),
    })
}

fn as_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnDef;

    fn schema() -> Schema {
        Schema::new(vec![ColumnDef {
            name: "age".into(),
            width: 3,
        }])
    }

    #[test]
    fn sum_and_avg_treat_non_numeric_as_zero() {
        let schema = schema();
        let rows = vec![vec!["30".to_string()], vec!["oops".to_string()], vec!["10".to_string()]];
        assert_eq!(compute_one(&schema, &rows, AggFunc::Sum, "age").unwrap(), "40");
        let avg: f64 = compute_one(&schema, &rows, AggFunc::Avg, "age")
            .unwrap()
            .parse()
            .unwrap();
        assert!((avg - 40.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn count_star_counts_rows_not_values() {
        let schema = schema();
        let rows = vec![vec!["30".to_string()], vec![String::new()]];
        assert_eq!(compute_one(&schema, &rows, AggFunc::Count, "*").unwrap(), "2");
    }

    #[test]
    fn count_column_excludes_empty_values() {
        let schema = schema();
        let rows = vec![vec!["30".to_string()], vec![String::new()]];
        assert_eq!(compute_one(&schema, &rows, AggFunc::Count, "age").unwrap(), "1");
    }
}
