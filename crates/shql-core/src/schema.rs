//! The schema resolver: loads a table's column list and maps names to
//! positional field indices (spec §4.2).

use std::io::Write as _;
use std::path::Path;

use crate::ast::ColumnDef;
use crate::error::{EngineError, Result};

/// A table's column list, in on-disk (1-based, but stored 0-based
/// internally) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Builds a schema from an already-parsed column list (used by
    /// `CREATE TABLE`, before anything is written to disk).
    #[must_use]
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Loads a schema file: one `name<TAB>width` line per column.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] on filesystem failure, or
    /// [`EngineError::Parse`] if a line is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut columns = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, '\t');
            let name = parts.next().unwrap_or_default();
            let width = parts.next().ok_or_else(|| {
                EngineError::Parse(format!(
                    "malformed schema line {} in {}: missing width",
                    lineno + 1,
                    path.display()
                ))
            })?;
            let width: u32 = width.trim_end_matches(['\r', '\n']).parse().map_err(|_| {
                EngineError::Parse(format!(
                    "malformed schema line {} in {}: width is not a number",
                    lineno + 1,
                    path.display()
                ))
            })?;
            columns.push(ColumnDef {
                name: name.to_string(),
                width,
            });
        }
        Ok(Self { columns })
    }

    /// Writes a schema file for `columns`.
    pub fn write(path: &Path, columns: &[ColumnDef]) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        for column in columns {
            writeln!(file, "{}\t{}", column.name, column.width)?;
        }
        Ok(())
    }

    /// Number of columns (and therefore fields a data row must have).
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// The full column list, in positional order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Resolves a column name to its zero-based positional index.
    ///
    /// Lookup is first-match left-to-right, per spec invariant 2 — two
    /// columns may legally share a name, and only the first is ever
    /// addressable by it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The display width declared for column `index`, if any.
    #[must_use]
    pub fn width(&self, index: usize) -> Option<u32> {
        self.columns.get(index).map(|c| c.width)
    }

    /// The name declared for column `index`, if any.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_first_match() {
        let schema = Schema::new(vec![
            ColumnDef {
                name: "name".into(),
                width: 20,
            },
            ColumnDef {
                name: "name".into(),
                width: 5,
            },
        ]);
        assert_eq!(schema.lookup("name"), Some(0));
        assert_eq!(schema.lookup("missing"), None);
    }

    #[test]
    fn load_round_trips_with_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users@");
        let columns = vec![
            ColumnDef {
                name: "name".into(),
                width: 20,
            },
            ColumnDef {
                name: "age".into(),
                width: 3,
            },
        ];
        Schema::write(&path, &columns).unwrap();
        let loaded = Schema::load(&path).unwrap();
        assert_eq!(loaded.field_count(), 2);
        assert_eq!(loaded.lookup("age"), Some(1));
        assert_eq!(loaded.width(1), Some(3));
    }
}
