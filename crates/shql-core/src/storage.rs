//! The file-backed storage model (spec §3, §4.6): opening, creating, and
//! dropping table files, and streaming or rewriting their rows.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ast::ColumnDef;
use crate::error::{EngineError, Result};
use crate::schema::Schema;
use crate::view::ViewSpec;

/// Whether a named table is present, absent, or in the corrupt
/// half-present state spec invariant 1 forbids operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Missing,
    Present,
    /// Exactly one of the schema/data files exists.
    Corrupt,
}

/// A database: a directory holding table and view files directly.
///
/// Selected once at process startup (spec §3 "Session values") and never
/// switched; `Database` itself carries no session state, only the path.
pub struct Database {
    root: PathBuf,
}

impl Database {
    /// Opens a database directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `root` does not exist or is not
    /// a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(EngineError::Config(format!(
                "database directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// The database directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn schema_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}@"))
    }

    fn data_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}~"))
    }

    fn view_path(&self, view: &str) -> PathBuf {
        self.root.join(format!("{view}!"))
    }

    fn table_state(&self, table: &str) -> TableState {
        let schema_exists = self.schema_path(table).is_file();
        let data_exists = self.data_path(table).is_file();
        match (schema_exists, data_exists) {
            (true, true) => TableState::Present,
            (false, false) => TableState::Missing,
            _ => TableState::Corrupt,
        }
    }

    /// Returns true if `table` exists as a well-formed table (both files
    /// present). A corrupt half-present state is reported as absent here;
    /// callers that need to distinguish it use [`Database::open_table`],
    /// which surfaces corruption as an error.
    #[must_use]
    pub fn table_exists(&self, table: &str) -> bool {
        self.table_state(table) == TableState::Present
    }

    /// Returns true if a view named `view` has been saved.
    #[must_use]
    pub fn view_exists(&self, view: &str) -> bool {
        self.view_path(view).is_file()
    }

    /// Opens an existing table, loading its schema.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the table does not exist;
    /// [`EngineError::Io`] if exactly one of its two files exists (a
    /// corrupt state spec invariant 1 forbids operating through) or on
    /// any other filesystem failure.
    pub fn open_table(&self, table: &str) -> Result<Table> {
        match self.table_state(table) {
            TableState::Missing => Err(EngineError::NotFound(format!("table {table}"))),
            TableState::Corrupt => {
                warn!(table, "table has only one of its schema/data files");
                Err(EngineError::Io(std::io::Error::other(format!(
                    "table {table} is corrupt: only one of its schema/data files exists"
                ))))
            }
            TableState::Present => {
                let schema = Schema::load(&self.schema_path(table))?;
                debug!(table, columns = schema.field_count(), "opened table");
                Ok(Table {
                    name: table.to_string(),
                    schema,
                    data_path: self.data_path(table),
                })
            }
        }
    }

    /// `CREATE TABLE`: writes the schema file, then touches an empty data
    /// file. From the caller's perspective both files appear atomically
    /// (spec §3 Lifecycle): the schema file is written first and the data
    /// file is created empty immediately after, with no statement-visible
    /// intermediate state.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyExists`] if either file already exists.
    pub fn create_table(&self, table: &str, columns: &[ColumnDef]) -> Result<()> {
        if self.table_state(table) != TableState::Missing {
            return Err(EngineError::AlreadyExists(format!("table {table}")));
        }
        Schema::write(&self.schema_path(table), columns)?;
        std::fs::File::create(self.data_path(table))?;
        debug!(table, columns = columns.len(), "created table");
        Ok(())
    }

    /// `DROP TABLE`: removes both files.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the table does not exist.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        if self.table_state(table) == TableState::Missing {
            return Err(EngineError::NotFound(format!("table {table}")));
        }
        let schema_path = self.schema_path(table);
        let data_path = self.data_path(table);
        if schema_path.is_file() {
            std::fs::remove_file(&schema_path)?;
        }
        if data_path.is_file() {
            std::fs::remove_file(&data_path)?;
        }
        debug!(table, "dropped table");
        Ok(())
    }

    /// `CREATE VIEW`: persists the join specification.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyExists`] if the view is already defined;
    /// [`EngineError::NotFound`] if any referenced table is missing.
    pub fn create_view(&self, view: &str, spec: &ViewSpec) -> Result<()> {
        if self.view_exists(view) {
            return Err(EngineError::AlreadyExists(format!("view {view}")));
        }
        for table in spec.tables() {
            if !self.table_exists(&table) {
                return Err(EngineError::NotFound(format!("table {table}")));
            }
        }
        spec.save(&self.view_path(view))?;
        debug!(view, "created view");
        Ok(())
    }

    /// `DROP VIEW`: removes the stored view definition.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the view is not defined.
    pub fn drop_view(&self, view: &str) -> Result<()> {
        if !self.view_exists(view) {
            return Err(EngineError::NotFound(format!("view {view}")));
        }
        std::fs::remove_file(self.view_path(view))?;
        debug!(view, "dropped view");
        Ok(())
    }

    /// Loads a previously saved view specification.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the view is not defined.
    pub fn load_view(&self, view: &str) -> Result<ViewSpec> {
        if !self.view_exists(view) {
            return Err(EngineError::NotFound(format!("view {view}")));
        }
        ViewSpec::load(&self.view_path(view))
    }
}

/// A handle to one open table: its schema, plus its data file path for
/// reading and rewriting rows.
pub struct Table {
    pub name: String,
    pub schema: Schema,
    data_path: PathBuf,
}

impl Table {
    /// Reads every row of the data file, splitting each line on TAB.
    ///
    /// Rows are returned in on-disk order, which is the ordering
    /// guarantee single-table `SELECT` without `ORDER BY` relies on
    /// (spec §5).
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] on filesystem failure.
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let text = std::fs::read_to_string(&self.data_path)?;
        Ok(text
            .lines()
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect())
    }

    /// Appends rows to the data file (`INSERT`). Each row is written as
    /// one TAB-joined line.
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] on filesystem failure.
    pub fn append(&self, rows: &[Vec<String>]) -> Result<()> {
        use std::io::Write as _;
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.data_path)?;
        for row in rows {
            writeln!(file, "{}", row.join("\t"))?;
        }
        Ok(())
    }

    /// Replaces the data file's contents with `rows` (`UPDATE`/`DELETE`).
    ///
    /// Writes the new content to a sibling temporary file on the same
    /// filesystem as the data file, then renames it into place. The
    /// rename is atomic with respect to any concurrent reader, and if the
    /// write fails partway the original data file is untouched (spec §5,
    /// §7).
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] on filesystem failure. The original file is
    /// left intact.
    pub fn rewrite(&self, rows: &[Vec<String>]) -> Result<()> {
        use std::io::Write as _;
        let dir = self
            .data_path
            .parent()
            .expect("data path always has a parent: the database directory");
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        for row in rows {
            writeln!(tmp, "{}", row.join("\t"))?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.data_path)
            .map_err(|e| EngineError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names_widths: &[(&str, u32)]) -> Vec<ColumnDef> {
        names_widths
            .iter()
            .map(|(name, width)| ColumnDef {
                name: (*name).to_string(),
                width: *width,
            })
            .collect()
    }

    #[test]
    fn create_open_drop_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let cols = columns(&[("name", 20), ("age", 3)]);
        db.create_table("users", &cols).unwrap();
        assert!(db.table_exists("users"));

        let table = db.open_table("users").unwrap();
        assert_eq!(table.schema.field_count(), 2);
        assert!(table.read_rows().unwrap().is_empty());

        table
            .append(&[vec!["Alice".into(), "30".into()]])
            .unwrap();
        assert_eq!(table.read_rows().unwrap(), vec![vec!["Alice".to_string(), "30".to_string()]]);

        db.drop_table("users").unwrap();
        assert!(!db.table_exists("users"));
    }

    #[test]
    fn create_table_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let cols = columns(&[("name", 20)]);
        db.create_table("users", &cols).unwrap();
        let err = db.create_table("users", &cols).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyExists(_)));
    }

    #[test]
    fn drop_missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let err = db.drop_table("ghost").unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn rewrite_is_atomic_and_preserves_rows_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.create_table("t", &columns(&[("a", 3)])).unwrap();
        let table = db.open_table("t").unwrap();
        table.append(&[vec!["1".into()], vec!["2".into()]]).unwrap();
        table.rewrite(&[vec!["2".into()]]).unwrap();
        assert_eq!(table.read_rows().unwrap(), vec![vec!["2".to_string()]]);
    }
}
