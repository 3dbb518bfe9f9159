//! Parses `SELECT` statements, including the `WHERE` expression grammar
//! (spec §4.3, §4.5) shared by `UPDATE`/`DELETE`.

use crate::ast::{
    AggFunc, CompareOp, CompareValue, OrderByItem, OrderDirection, SelectColumn, SelectStatement,
    WhereExpr,
};
use crate::error::{EngineError, Result};
use crate::lexer::{Keyword, Operator};

use super::cursor::Cursor;

const AGGREGATES: [(&str, AggFunc); 5] = [
    ("count", AggFunc::Count),
    ("sum", AggFunc::Sum),
    ("avg", AggFunc::Avg),
    ("min", AggFunc::Min),
    ("max", AggFunc::Max),
];

fn agg_func(word: &str) -> Option<AggFunc> {
    let lower = word.to_ascii_lowercase();
    AGGREGATES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, func)| *func)
}

fn to_compare_op(op: Operator) -> CompareOp {
    match op {
        Operator::Eq => CompareOp::Eq,
        Operator::Ne => CompareOp::Ne,
        Operator::Lt => CompareOp::Lt,
        Operator::Le => CompareOp::Le,
        Operator::Gt => CompareOp::Gt,
        Operator::Ge => CompareOp::Ge,
        Operator::Bang => unreachable!("Cursor::comparison_op never yields a lone Bang"),
    }
}

/// Parses a complete `SELECT` statement, including any chained `UNION`.
/// Used both at top level and for every nested subquery (spec §4.5), so
/// this is the single recursive entry point a `select_stmt` production
/// resolves to everywhere it appears in the grammar.
pub(crate) fn parse_select(cursor: &mut Cursor<'_>) -> Result<SelectStatement> {
    cursor.expect_keyword(Keyword::Select)?;
    let distinct = cursor.eat_keyword(Keyword::Distinct);
    let columns = parse_select_list(cursor)?;
    cursor.expect_keyword(Keyword::From)?;
    let tables = parse_table_list(cursor)?;
    let where_clause = if cursor.eat_keyword(Keyword::Where) {
        Some(parse_or_expr(cursor)?)
    } else {
        None
    };
    let order_by = if cursor.eat_keyword(Keyword::Order) {
        cursor.expect_keyword(Keyword::By)?;
        parse_order_list(cursor)?
    } else {
        Vec::new()
    };
    let union = if cursor.eat_keyword(Keyword::Union) {
        Some(Box::new(parse_select(cursor)?))
    } else {
        None
    };
    Ok(SelectStatement {
        distinct,
        columns,
        tables,
        where_clause,
        order_by,
        union,
    })
}

fn parse_select_list(cursor: &mut Cursor<'_>) -> Result<Vec<SelectColumn>> {
    let mut columns = Vec::new();
    while cursor.peek_keyword() != Some(Keyword::From) && !cursor.at_eof() {
        columns.push(parse_select_column(cursor)?);
    }
    if columns.is_empty() {
        return Err(EngineError::Parse(
            "expected at least one selected column".into(),
        ));
    }
    Ok(columns)
}

fn parse_select_column(cursor: &mut Cursor<'_>) -> Result<SelectColumn> {
    if cursor.eat_star() {
        return Ok(SelectColumn::Star);
    }
    let word = cursor.ident()?;
    if let Some(func) = agg_func(&word) {
        if cursor.eat_lparen() {
            let column = if cursor.eat_star() {
                "*".to_string()
            } else {
                cursor.ident()?
            };
            cursor.expect_rparen()?;
            return Ok(SelectColumn::Aggregate(func, column));
        }
    }
    Ok(SelectColumn::Column(word))
}

fn parse_table_list(cursor: &mut Cursor<'_>) -> Result<Vec<String>> {
    let mut tables = Vec::new();
    loop {
        let stop = cursor.at_eof()
            || matches!(
                cursor.peek_keyword(),
                Some(Keyword::Where | Keyword::Order | Keyword::Union)
            );
        if stop {
            break;
        }
        tables.push(cursor.ident()?);
    }
    if tables.is_empty() {
        return Err(EngineError::Parse("expected at least one table".into()));
    }
    Ok(tables)
}

fn parse_order_list(cursor: &mut Cursor<'_>) -> Result<Vec<OrderByItem>> {
    let mut items = Vec::new();
    loop {
        let column = cursor.ident()?;
        let numeric = cursor.eat_keyword(Keyword::Num);
        let direction = if cursor.eat_keyword(Keyword::Desc) {
            OrderDirection::Desc
        } else {
            cursor.eat_keyword(Keyword::Asc);
            OrderDirection::Asc
        };
        items.push(OrderByItem {
            column,
            numeric,
            direction,
        });
        if cursor.at_eof() || cursor.peek_keyword() == Some(Keyword::Union) {
            break;
        }
    }
    Ok(items)
}

/// `expr := or_expr` (top of the precedence climb: OR binds loosest).
pub(crate) fn parse_or_expr(cursor: &mut Cursor<'_>) -> Result<WhereExpr> {
    let mut lhs = parse_and_expr(cursor)?;
    while cursor.eat_keyword(Keyword::Or) {
        let rhs = parse_and_expr(cursor)?;
        lhs = WhereExpr::Or(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_and_expr(cursor: &mut Cursor<'_>) -> Result<WhereExpr> {
    let mut lhs = parse_term(cursor)?;
    while cursor.eat_keyword(Keyword::And) {
        let rhs = parse_term(cursor)?;
        lhs = WhereExpr::And(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_term(cursor: &mut Cursor<'_>) -> Result<WhereExpr> {
    if cursor.eat_keyword(Keyword::Not) {
        return Ok(WhereExpr::Not(Box::new(parse_primary(cursor)?)));
    }
    parse_primary(cursor)
}

fn parse_primary(cursor: &mut Cursor<'_>) -> Result<WhereExpr> {
    if cursor.eat_lparen() {
        let inner = parse_or_expr(cursor)?;
        cursor.expect_rparen()?;
        return Ok(inner);
    }
    let value = cursor.literal()?;
    if cursor.eat_keyword(Keyword::In) {
        let subquery = parse_select(cursor)?;
        return Ok(WhereExpr::In {
            value,
            negated: false,
            subquery: Box::new(subquery),
        });
    }
    if cursor.peek_keyword() == Some(Keyword::Not) && cursor.peek_nth_keyword(1) == Some(Keyword::In) {
        cursor.eat_keyword(Keyword::Not);
        cursor.eat_keyword(Keyword::In);
        let subquery = parse_select(cursor)?;
        return Ok(WhereExpr::In {
            value,
            negated: true,
            subquery: Box::new(subquery),
        });
    }
    let op = to_compare_op(cursor.comparison_op()?);
    let rhs = parse_compare_value(cursor)?;
    Ok(WhereExpr::Compare(CompareValue::Literal(value), op, rhs))
}

fn parse_compare_value(cursor: &mut Cursor<'_>) -> Result<CompareValue> {
    if cursor.peek_keyword() == Some(Keyword::Select) {
        Ok(CompareValue::Subquery(Box::new(parse_select(cursor)?)))
    } else {
        Ok(CompareValue::Literal(cursor.literal()?))
    }
}
