//! End-to-end coverage of the CLI surface (spec §6, §4.7): argument
//! parsing, the statement-terminator loop, and result rendering, driven
//! through the actual `shql` binary.

use assert_cmd::Command;
use tempfile::TempDir;

fn shql() -> Command {
    Command::cargo_bin("shql").expect("binary should exist")
}

#[test]
fn missing_database_directory_is_a_configuration_error() {
    shql()
        .arg("/no/such/directory/shql-cli-test")
        .assert()
        .failure();
}

#[test]
fn create_insert_select_round_trip_through_stdin() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg(dir.path())
        .write_stdin(
            "create table users ( name 20 age 3 ) /g\n\
             insert into users values ( 'Alice' 30 'Bob' 25 ) /g\n\
             select * from users /g\n\
             /q\n",
        )
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Alice"));
    assert!(stdout.contains("Bob"));
    assert!(stdout.contains("(2 rows)"));
}

#[test]
fn quiet_flag_suppresses_headers_and_row_counts() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg("-q")
        .arg(dir.path())
        .write_stdin(
            "create table t ( a 3 ) /g\n\
             insert into t values ( 1 ) /g\n\
             select * from t /g\n\
             /q\n",
        )
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn statement_spanning_multiple_lines_is_accumulated_until_the_terminator() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg(dir.path())
        .write_stdin(
            "create table t ( a 3 )\n\
             /g\n\
             insert into t\n\
             values ( 1 2 )\n\
             /g\n\
             select a from t /g\n\
             /q\n",
        )
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("(2 rows)"));
}

#[test]
fn a_statement_error_does_not_end_the_session() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg(dir.path())
        .write_stdin(
            "select * from ghost_table /g\n\
             create table t ( a 3 ) /g\n\
             select * from t /g\n\
             /q\n",
        )
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("(0 rows)"));
}

#[test]
fn print_renders_width_padded_columns() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg(dir.path())
        .write_stdin(
            "create table t ( a 5 ) /g\n\
             insert into t values ( 1 ) /g\n\
             print t /g\n\
             /q\n",
        )
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.lines().any(|line| line.starts_with("a    ")));
}

#[test]
fn help_prints_usage_text() {
    let dir = TempDir::new().unwrap();
    let assert = shql()
        .arg(dir.path())
        .write_stdin("help /g\n/q\n")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("shql"));
}
