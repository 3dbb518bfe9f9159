//! The query engine core: tokenizer, parsers, predicate compiler,
//! executor, and file-backed storage model for an interactive SQL-like
//! query language over tab-delimited flat files.
//!
//! This crate has no interactive loop of its own (spec §1): it exposes
//! [`run`], which a REPL (or anything else) calls once per accumulated
//! statement.

pub mod ast;
mod error;
mod exec;
mod lexer;
mod parser;
mod predicate;
mod schema;
mod session;
mod storage;
mod view;

pub use error::{EngineError, Result};
pub use exec::ExecResult;
pub use lexer::Lexer;
pub use schema::Schema;
pub use session::Session;
pub use storage::{Database, Table};
pub use view::ViewSpec;

/// Tokenizes, parses, and executes one complete statement against
/// `session`.
///
/// This is the single entry point the external statement loop (spec
/// §4.7) invokes on every `Collecting` → `Executing` transition.
///
/// # Errors
/// Any [`EngineError`]; the caller is expected to report it and keep the
/// session alive (spec §7 propagation policy).
pub fn run(session: &mut Session, statement_text: &str) -> Result<ExecResult> {
    let tokens = Lexer::tokenize(statement_text)?;
    let statement = parser::parse_statement(&tokens)?;
    exec::execute(session, &statement)
}
