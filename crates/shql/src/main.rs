//! Interactive CLI for the shql flat-file query engine.
//!
//! Owns everything spec.md calls out as an external collaborator: the
//! line-editing REPL, the statement-terminator state machine (spec
//! §4.7), and result rendering. The actual tokenizing/parsing/execution
//! lives in `shql-core`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shql_core::{ExecResult, Session};
use tracing::{info, Level};

const HELP_TEXT: &str = "\
shql: an interactive query engine over tab-delimited flat files.

Statements: select, insert into, update, delete from, create table,
drop table, create view, drop view.

Submit a statement with a line containing /g (or \\g). /q (or \\q) quits.
/p (or \\p) reprints the statement buffer without running it.";

/// Interactive query engine over a directory of tab-delimited flat files.
#[derive(Parser, Debug)]
#[command(name = "shql", version, about)]
struct Cli {
    /// Suppress column headers and row-count trailers.
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// The database directory to operate on.
    database_directory: PathBuf,
}

/// Resolves the database directory argument against `SHQL_ROOT` when it
/// is relative and doesn't exist as given (spec §6 "Environment").
fn resolve_database_dir(arg: &Path) -> PathBuf {
    if arg.is_absolute() || arg.exists() {
        return arg.to_path_buf();
    }
    if let Ok(root) = std::env::var("SHQL_ROOT") {
        let candidate = PathBuf::from(root).join(arg);
        if candidate.exists() {
            return candidate;
        }
    }
    arg.to_path_buf()
}

enum Terminator {
    Go,
    Quit,
    Print,
}

/// Finds the first unquoted `/g`, `/q`, `/p`, `\g`, `\q`, or `\p` in
/// `line` and returns its kind and byte offset. Terminators inside a
/// quoted string don't count (spec §6).
fn find_terminator(line: &str) -> Option<(Terminator, usize)> {
    let bytes = line.as_bytes();
    let mut in_quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => {
                if c == b'\'' || c == b'"' {
                    in_quote = Some(c);
                } else if (c == b'/' || c == b'\\') && i + 1 < bytes.len() {
                    let terminator = match bytes[i + 1] {
                        b'g' => Some(Terminator::Go),
                        b'q' => Some(Terminator::Quit),
                        b'p' => Some(Terminator::Print),
                        _ => None,
                    };
                    if let Some(terminator) = terminator {
                        return Some((terminator, i));
                    }
                }
            }
        }
        i += 1;
    }
    None
}

/// Pads `value` to `width` columns, the way `print` renders a table
/// (spec §4.5: "column-padded using the declared widths"). A value
/// longer than its declared width is never truncated — widths are
/// advisory (spec invariant 5), not a constraint on stored content.
fn pad(value: &str, width: u32) -> String {
    format!("{value:<width$}", width = width as usize)
}

fn render(result: &ExecResult, quiet: bool) {
    match result {
        ExecResult::Rows { columns, rows } => {
            if !quiet {
                println!("{}", columns.join("\t"));
            }
            for row in rows {
                println!("{}", row.join("\t"));
            }
            if !quiet {
                println!("({} rows)", rows.len());
            }
        }
        ExecResult::Printed { columns, widths, rows } => {
            if !quiet {
                let header: Vec<String> = columns
                    .iter()
                    .zip(widths)
                    .map(|(c, w)| pad(c, *w))
                    .collect();
                println!("{}", header.join(" "));
            }
            for row in rows {
                let line: Vec<String> = row
                    .iter()
                    .zip(widths)
                    .map(|(v, w)| pad(v, *w))
                    .collect();
                println!("{}", line.join(" "));
            }
            if !quiet {
                println!("({} rows)", rows.len());
            }
        }
        ExecResult::RowCount(n) => {
            if !quiet {
                println!("({n} rows)");
            }
        }
        ExecResult::Done => {}
        ExecResult::Help => println!("{HELP_TEXT}"),
    }
}

/// Runs the `Collecting`/`Executing`/`Terminated` state machine of spec
/// §4.7 over stdin, feeding complete statement text to `shql_core::run`.
fn repl(session: &mut Session) -> Result<()> {
    let mut buffer = String::new();
    for line in std::io::stdin().lines() {
        let line = line.context("reading statement input")?;
        let Some((terminator, pos)) = find_terminator(&line) else {
            buffer.push_str(&line);
            buffer.push(' ');
            continue;
        };
        buffer.push_str(&line[..pos]);
        match terminator {
            Terminator::Go => {
                let text = buffer.trim().to_string();
                buffer.clear();
                if !text.is_empty() {
                    match shql_core::run(session, &text) {
                        Ok(result) => render(&result, session.quiet),
                        Err(err) => eprintln!("error: {err}"),
                    }
                }
            }
            Terminator::Print => println!("{}", buffer.trim()),
            Terminator::Quit => return Ok(()),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();
    let db_dir = resolve_database_dir(&cli.database_directory);

    let mut session = match Session::open(&db_dir, cli.quiet) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("shql: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(directory = %db_dir.display(), "opened database");

    match repl(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shql: {err:#}");
            ExitCode::FAILURE
        }
    }
}
