//! View storage: a named, saved join specification (spec §3, §4.6).
//!
//! A view is never materialized — `SELECT ... FROM viewname` is rewritten
//! at plan time into the equivalent multi-table `SELECT` (spec §4.5). This
//! module only owns the on-disk representation of the saved spec.

use std::io::Write as _;
use std::path::Path;

use crate::ast::ViewJoin;
use crate::error::{EngineError, Result};

/// A saved equi-join specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    pub joins: Vec<ViewJoin>,
}

impl ViewSpec {
    /// The tables this view touches, in first-appearance order across its
    /// join clauses — this becomes the `FROM` table list of the rewritten
    /// query.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for join in &self.joins {
            if !seen.contains(&join.left_table) {
                seen.push(join.left_table.clone());
            }
            if !seen.contains(&join.right_table) {
                seen.push(join.right_table.clone());
            }
        }
        seen
    }

    /// Serializes the spec as one `left_table<TAB>left_col<TAB>right_table<TAB>right_col`
    /// line per join clause.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        for join in &self.joins {
            writeln!(
                file,
                "{}\t{}\t{}\t{}",
                join.left_table, join.left_column, join.right_table, join.right_column
            )?;
        }
        Ok(())
    }

    /// Loads a previously saved spec.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut joins = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let [left_table, left_column, right_table, right_column] = fields[..] else {
                return Err(EngineError::Parse(format!(
                    "malformed view definition line {} in {}",
                    lineno + 1,
                    path.display()
                )));
            };
            joins.push(ViewJoin {
                left_table: left_table.to_string(),
                left_column: left_column.to_string(),
                right_table: right_table.to_string(),
                right_column: right_column.to_string(),
            });
        }
        Ok(Self { joins })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_preserves_first_appearance_order() {
        let spec = ViewSpec {
            joins: vec![ViewJoin {
                left_table: "users".into(),
                left_column: "dept_id".into(),
                right_table: "depts".into(),
                right_column: "id".into(),
            }],
        };
        assert_eq!(spec.tables(), vec!["users".to_string(), "depts".to_string()]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v!");
        let spec = ViewSpec {
            joins: vec![ViewJoin {
                left_table: "users".into(),
                left_column: "dept_id".into(),
                right_table: "depts".into(),
                right_column: "id".into(),
            }],
        };
        spec.save(&path).unwrap();
        let loaded = ViewSpec::load(&path).unwrap();
        assert_eq!(loaded, spec);
    }
}
