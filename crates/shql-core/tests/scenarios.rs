//! End-to-end coverage of the scenarios in spec §8.

use shql_core::{EngineError, ExecResult, Session};

fn open_session() -> (tempfile::TempDir, Session) {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::open(dir.path(), true).unwrap();
    (dir, session)
}

fn rows(session: &mut Session, stmt: &str) -> (Vec<String>, Vec<Vec<String>>) {
    match shql_core::run(session, stmt).unwrap() {
        ExecResult::Rows { columns, rows } => (columns, rows),
        other => panic!("expected rows, got a non-row result: {}", matches!(other, ExecResult::Done)),
    }
}

fn exec(session: &mut Session, stmt: &str) -> ExecResult {
    shql_core::run(session, stmt).unwrap()
}

#[test]
fn scenario_a_create_insert_select() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 30 'Bob' 25 )",
    );
    let (_, out) = rows(&mut session, "select * from users");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], vec!["Alice".to_string(), "30".to_string()]);
    assert_eq!(out[1], vec!["Bob".to_string(), "25".to_string()]);
}

#[test]
fn scenario_b_where_filter() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 30 'Bob' 25 'Carol' 35 )",
    );
    let (_, out) = rows(&mut session, "select name from users where age > 28");
    assert_eq!(out, vec![vec!["Alice".to_string()], vec!["Carol".to_string()]]);
}

#[test]
fn scenario_c_numeric_order_by() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 30 'Bob' 25 'Carol' 35 )",
    );
    let (_, out) = rows(&mut session, "select name from users order by age num");
    assert_eq!(
        out,
        vec![
            vec!["Bob".to_string()],
            vec!["Alice".to_string()],
            vec!["Carol".to_string()],
        ]
    );
}

#[test]
fn scenario_d_two_table_equi_join() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 dept_id 3 )");
    exec(&mut session, "insert into users values ( 'Alice' 1 'Bob' 2 )");
    exec(&mut session, "create table depts ( id 3 dept_name 20 )");
    exec(
        &mut session,
        "insert into depts values ( 1 'Engineering' 2 'Sales' )",
    );
    let (_, out) = rows(
        &mut session,
        "select name dept_name from users depts where dept_id = id",
    );
    assert_eq!(
        out,
        vec![
            vec!["Alice".to_string(), "Engineering".to_string()],
            vec!["Bob".to_string(), "Sales".to_string()],
        ]
    );
}

#[test]
fn scenario_e_scalar_subquery() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 30 'Bob' 25 'Carol' 35 )",
    );
    let (_, out) = rows(
        &mut session,
        "select name from users where age = select max(age) from users",
    );
    assert_eq!(out, vec![vec!["Carol".to_string()]]);
}

#[test]
fn scenario_f_in_subquery() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 status 1 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 'A' 'Bob' 'B' 'Carol' 'C' )",
    );
    exec(&mut session, "create table valid ( code 1 )");
    exec(&mut session, "insert into valid values ( 'A' 'B' )");
    let (_, out) = rows(
        &mut session,
        "select name from users where status in select code from valid",
    );
    assert_eq!(out, vec![vec!["Alice".to_string()], vec!["Bob".to_string()]]);
}

#[test]
fn insert_arity_mismatch_is_rejected() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    let err = shql_core::run(&mut session, "insert into users values ( 'Alice' 30 'Bob' )")
        .unwrap_err();
    assert!(matches!(err, EngineError::Arity(_)));
}

#[test]
fn join_without_a_connecting_predicate_fails() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 dept_id 3 )");
    exec(&mut session, "create table depts ( id 3 dept_name 20 )");
    let err = shql_core::run(&mut session, "select * from users depts").unwrap_err();
    assert!(matches!(err, EngineError::JoinOrder));
}

#[test]
fn delete_then_count_matches_property_five() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table users ( name 20 age 3 )");
    exec(
        &mut session,
        "insert into users values ( 'Alice' 30 'Bob' 25 )",
    );
    exec(&mut session, "delete from users where age > 28");
    let (_, out) = rows(&mut session, "select count(*) from users where age > 28");
    assert_eq!(out, vec![vec!["0".to_string()]]);
}

#[test]
fn distinct_select_has_no_duplicate_tuples() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table t ( a 3 )");
    exec(&mut session, "insert into t values ( 1 1 2 1 )");
    let (_, out) = rows(&mut session, "select distinct a from t");
    assert_eq!(out, vec![vec!["1".to_string()], vec!["2".to_string()]]);
}

#[test]
fn union_rejects_mismatched_column_counts() {
    let (_dir, mut session) = open_session();
    exec(&mut session, "create table t ( a 3 b 3 )");
    exec(&mut session, "insert into t values ( 1 2 )");
    let err = shql_core::run(&mut session, "select a from t union select a b from t").unwrap_err();
    assert!(matches!(err, EngineError::Arity(_)));
}
