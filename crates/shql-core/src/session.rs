//! Session state (spec §3 "Session values", §4.7): the small amount of
//! context that survives across statements in one interactive run.

use std::path::PathBuf;

use crate::error::Result;
use crate::storage::Database;

/// State shared across every statement executed in one run of the engine.
///
/// A fresh `Session` is created once per process; `subselect` is the only
/// field that is ever pushed and popped, and only by the executor while
/// it is evaluating a nested `SELECT` on behalf of a predicate.
pub struct Session {
    db: Database,
    /// Suppresses the "N rows" trailer and column headers that an
    /// interactive run prints after a statement (spec §4.7).
    pub quiet: bool,
    /// Set while evaluating a statement on behalf of a subquery, so the
    /// executor can skip the interactive-only framing it would otherwise
    /// apply to a top-level `SELECT`.
    subselect: bool,
}

impl Session {
    /// Opens `root` as the active database directory and starts a fresh
    /// session over it.
    ///
    /// # Errors
    /// Propagates [`crate::error::EngineError::Config`] if `root` is not a
    /// database directory.
    pub fn open(root: impl Into<PathBuf>, quiet: bool) -> Result<Self> {
        Ok(Self {
            db: Database::open(root)?,
            quiet,
            subselect: false,
        })
    }

    /// The active database.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// True while a nested `SELECT` is being evaluated on behalf of a
    /// predicate, rather than at top level.
    #[must_use]
    pub fn in_subselect(&self) -> bool {
        self.subselect
    }

    /// Runs `f` with the subselect flag set, restoring the previous value
    /// afterwards even if `f` returns an error. Subqueries nest (a
    /// subquery's `WHERE` clause may itself hold a subquery), so this
    /// saves and restores rather than assuming the flag starts `false`.
    pub fn with_subselect<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let previous = self.subselect;
        self.subselect = true;
        let result = f(self);
        self.subselect = previous;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subselect_flag_nests_and_restores() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path(), true).unwrap();
        assert!(!session.in_subselect());
        session
            .with_subselect(|s| {
                assert!(s.in_subselect());
                s.with_subselect(|s2| {
                    assert!(s2.in_subselect());
                    Ok(())
                })
            })
            .unwrap();
        assert!(!session.in_subselect());
    }
}
