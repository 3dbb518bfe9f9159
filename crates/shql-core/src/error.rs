//! Error types for the query engine.
//!
//! Every error kind here corresponds to one user-visible message: the
//! session recovers at the statement boundary and continues (see
//! [`crate::session`]).

use thiserror::Error;

/// All errors the engine can report back to a caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The tokenizer or a statement parser could not interpret the input.
    #[error("parse error: {0}")]
    Parse(String),

    /// A table, view, or column does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// `CREATE TABLE`/`CREATE VIEW` named something that already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// `INSERT` value count was not a multiple of the column count, or
    /// `UPDATE`/`UNION` referenced mismatched columns.
    #[error("arity error: {0}")]
    Arity(String),

    /// No equi-join clause connects the next `FROM`-list table to the
    /// accumulated intermediate relation.
    #[error("join not found, try reordering tables")]
    JoinOrder,

    /// A scalar subquery returned zero or more than one row/column.
    #[error("subquery error: {0}")]
    Subquery(String),

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Startup-time problem: bad or missing database directory.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
