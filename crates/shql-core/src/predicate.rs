//! The predicate compiler (spec §4.3): turns a parsed WHERE clause into a
//! callable predicate over a record, resolving column names against a
//! schema once at compile time rather than on every row.

use std::cell::RefCell;
use std::cmp::Ordering;

use crate::ast::{CompareOp, CompareValue, Literal, SelectStatement, WhereExpr};
use crate::error::{EngineError, Result};
use crate::schema::Schema;

/// One row of a table, addressed positionally.
pub type Record<'a> = &'a [String];

/// Compares two field values the way the predicate compiler does:
/// numerically if both parse as numbers, lexicographically otherwise.
/// Used for `<`/`>`/`<=`/`>=` and for `MIN`/`MAX` aggregates, which the
/// spec defines in terms of "the predicate compiler's comparison rule".
#[must_use]
pub fn cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn eval_op(a: &str, b: &str, op: CompareOp) -> bool {
    match op {
        // Equality is always string equality: this trivially satisfies
        // "equality of the string representation implies equality under
        // either rule" without needing a numeric special case.
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
        CompareOp::Lt => cmp(a, b).is_lt(),
        CompareOp::Le => cmp(a, b).is_le(),
        CompareOp::Gt => cmp(a, b).is_gt(),
        CompareOp::Ge => cmp(a, b).is_ge(),
    }
}

/// Anything that can run a nested `SELECT` and hand back its rows. The
/// executor implements this; the predicate compiler only needs it to
/// resolve subqueries lazily, on first use (spec §4.3).
pub trait SubqueryRunner {
    /// Runs `stmt` as a nested statement (subselect flag set) and returns
    /// its rows.
    ///
    /// # Errors
    /// Propagates whatever the nested statement failed with.
    fn run(&mut self, stmt: &SelectStatement) -> Result<Vec<Vec<String>>>;
}

/// A resolved comparison operand: either a fixed position in the record,
/// a literal string, or a subquery whose result is cached after first
/// evaluation.
enum Operand {
    Field(usize),
    Value(String),
    ScalarSubquery {
        stmt: SelectStatement,
        cache: RefCell<Option<String>>,
    },
}

impl Operand {
    fn resolve(&self, record: Record<'_>, runner: &mut dyn SubqueryRunner) -> Result<String> {
        match self {
            Self::Field(i) => Ok(record.get(*i).cloned().unwrap_or_default()),
            Self::Value(s) => Ok(s.clone()),
            Self::ScalarSubquery { stmt, cache } => {
                if let Some(cached) = cache.borrow().as_ref() {
                    return Ok(cached.clone());
                }
                let rows = runner.run(stmt)?;
                let value = match rows.as_slice() {
                    [row] if row.len() == 1 => row[0].clone(),
                    _ => {
                        return Err(EngineError::Subquery(
                            "scalar subquery must return exactly one row and one column".into(),
                        ));
                    }
                };
                *cache.borrow_mut() = Some(value.clone());
                Ok(value)
            }
        }
    }
}

enum Node {
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    Compare(Operand, CompareOp, Operand),
    In {
        operand: Operand,
        negated: bool,
        stmt: SelectStatement,
        cache: RefCell<Option<Vec<String>>>,
    },
}

/// A compiled WHERE clause: a boolean predicate over one record, with any
/// embedded subqueries resolved lazily and cached.
pub struct Predicate {
    root: Node,
}

impl Predicate {
    /// Compiles a parsed WHERE clause against `schema`. Identifiers that
    /// resolve to a column become field references; everything else
    /// (including anything that merely looks like a number) becomes a
    /// literal equal to its own text (spec §4.3, §9).
    #[must_use]
    pub fn compile(expr: &WhereExpr, schema: &Schema) -> Self {
        Self {
            root: compile_node(expr, schema),
        }
    }

    /// Evaluates the predicate against one record.
    ///
    /// # Errors
    /// Propagates a subquery failure (e.g. a scalar subquery that did not
    /// return exactly one row/column).
    pub fn eval(&self, record: Record<'_>, runner: &mut dyn SubqueryRunner) -> Result<bool> {
        eval_node(&self.root, record, runner)
    }
}

fn resolve_literal(lit: &Literal, schema: &Schema) -> Operand {
    match lit {
        Literal::Quoted(s) => Operand::Value(s.clone()),
        Literal::Bareword(s) => match schema.lookup(s) {
            Some(index) => Operand::Field(index),
            None => Operand::Value(s.clone()),
        },
    }
}

fn resolve_value(value: &CompareValue, schema: &Schema) -> Operand {
    match value {
        CompareValue::Literal(lit) => resolve_literal(lit, schema),
        CompareValue::Subquery(stmt) => Operand::ScalarSubquery {
            stmt: (**stmt).clone(),
            cache: RefCell::new(None),
        },
    }
}

fn compile_node(expr: &WhereExpr, schema: &Schema) -> Node {
    match expr {
        WhereExpr::And(l, r) => Node::And(
            Box::new(compile_node(l, schema)),
            Box::new(compile_node(r, schema)),
        ),
        WhereExpr::Or(l, r) => Node::Or(
            Box::new(compile_node(l, schema)),
            Box::new(compile_node(r, schema)),
        ),
        WhereExpr::Not(inner) => Node::Not(Box::new(compile_node(inner, schema))),
        WhereExpr::Compare(lhs, op, rhs) => {
            Node::Compare(resolve_value(lhs, schema), *op, resolve_value(rhs, schema))
        }
        WhereExpr::In {
            value,
            negated,
            subquery,
        } => Node::In {
            operand: resolve_literal(value, schema),
            negated: *negated,
            stmt: (**subquery).clone(),
            cache: RefCell::new(None),
        },
    }
}

fn eval_node(node: &Node, record: Record<'_>, runner: &mut dyn SubqueryRunner) -> Result<bool> {
    match node {
        Node::And(l, r) => Ok(eval_node(l, record, runner)? && eval_node(r, record, runner)?),
        Node::Or(l, r) => Ok(eval_node(l, record, runner)? || eval_node(r, record, runner)?),
        Node::Not(inner) => Ok(!eval_node(inner, record, runner)?),
        Node::Compare(lhs, op, rhs) => {
            let a = lhs.resolve(record, runner)?;
            let b = rhs.resolve(record, runner)?;
            Ok(eval_op(&a, &b, *op))
        }
        Node::In {
            operand,
            negated,
            stmt,
            cache,
        } => {
            let needle = operand.resolve(record, runner)?;
            if cache.borrow().is_none() {
                let rows = runner.run(stmt)?;
                let values = rows
                    .into_iter()
                    .map(|row| row.into_iter().next().unwrap_or_default())
                    .collect::<Vec<_>>();
                *cache.borrow_mut() = Some(values);
            }
            let found = cache
                .borrow()
                .as_ref()
                .expect("just populated above")
                .iter()
                .any(|v| *v == needle);
            Ok(found != *negated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnDef;

    struct NoSubqueries;
    impl SubqueryRunner for NoSubqueries {
        fn run(&mut self, _stmt: &SelectStatement) -> Result<Vec<Vec<String>>> {
            panic!("no subqueries expected in this test");
        }
    }

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef {
                name: "name".into(),
                width: 20,
            },
            ColumnDef {
                name: "age".into(),
                width: 3,
            },
        ])
    }

    #[test]
    fn compares_numeric_fields_numerically() {
        let schema = schema();
        let expr = WhereExpr::Compare(
            CompareValue::Literal(Literal::Bareword("age".into())),
            CompareOp::Gt,
            CompareValue::Literal(Literal::Bareword("9".into())),
        );
        let pred = Predicate::compile(&expr, &schema);
        let record = vec!["Alice".to_string(), "30".to_string()];
        assert!(pred.eval(&record, &mut NoSubqueries).unwrap());
    }

    #[test]
    fn unresolved_identifier_becomes_a_literal() {
        let schema = schema();
        // `status` isn't a column; comparing it against itself is really
        // comparing the literal "status" to the literal "status".
        let expr = WhereExpr::Compare(
            CompareValue::Literal(Literal::Bareword("status".into())),
            CompareOp::Eq,
            CompareValue::Literal(Literal::Bareword("status".into())),
        );
        let pred = Predicate::compile(&expr, &schema);
        let record = vec!["Alice".to_string(), "30".to_string()];
        assert!(pred.eval(&record, &mut NoSubqueries).unwrap());
    }

    #[test]
    fn and_or_not_precedence_is_respected_by_caller_structure() {
        let schema = schema();
        // not (age = 30) and name = 'Alice'
        let expr = WhereExpr::And(
            Box::new(WhereExpr::Not(Box::new(WhereExpr::Compare(
                CompareValue::Literal(Literal::Bareword("age".into())),
                CompareOp::Eq,
                CompareValue::Literal(Literal::Bareword("30".into())),
            )))),
            Box::new(WhereExpr::Compare(
                CompareValue::Literal(Literal::Bareword("name".into())),
                CompareOp::Eq,
                CompareValue::Literal(Literal::Quoted("Alice".into())),
            )),
        );
        let pred = Predicate::compile(&expr, &schema);
        let record = vec!["Alice".to_string(), "30".to_string()];
        assert!(!pred.eval(&record, &mut NoSubqueries).unwrap());
    }
}
