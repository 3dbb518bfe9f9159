//! Statement AST types: one shape per dispatcher target (see spec §4.4).

use super::expr::{Literal, WhereExpr};

/// An aggregate function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// One entry of a `SELECT` column list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// `*`
    Star,
    /// A bare column name.
    Column(String),
    /// `agg(column)`. `column` is `"*"` only for `COUNT(*)`, which counts
    /// rows rather than non-empty values of a named column (a small,
    /// natural supplement over spec.md's literal `agg(column)` grammar —
    /// see DESIGN.md).
    Aggregate(AggFunc, String),
}

/// Sort direction for an `ORDER BY` entry. Ascending is the default when
/// neither keyword is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// One `ORDER BY` column, with its optional `num` and direction modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub column: String,
    pub numeric: bool,
    pub direction: OrderDirection,
}

/// A fully parsed `SELECT` statement, including any `UNION`-chained tail.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub distinct: bool,
    pub columns: Vec<SelectColumn>,
    pub tables: Vec<String>,
    pub where_clause: Option<WhereExpr>,
    pub order_by: Vec<OrderByItem>,
    pub union: Option<Box<SelectStatement>>,
}

/// `INSERT INTO name VALUES ( v1 v2 … )`.
///
/// `values` is the flat token list exactly as written; the executor
/// slices it into groups of the table's column count (spec §4.6).
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub values: Vec<Literal>,
}

/// One `SET column = value` assignment in an `UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Literal,
}

/// `UPDATE name SET … [WHERE …]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<WhereExpr>,
}

/// `DELETE FROM name [WHERE …]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub where_clause: Option<WhereExpr>,
}

/// One column of a `CREATE TABLE` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub width: u32,
}

/// `CREATE TABLE name ( col width [col width …] )`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

/// `DROP TABLE name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    pub table: String,
}

/// One `t1.k = t2.k` equi-join clause of a view definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewJoin {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
}

/// `CREATE VIEW name ( t1.k = t2.k [, …] )`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    pub view: String,
    pub joins: Vec<ViewJoin>,
}

/// `DROP VIEW name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropViewStatement {
    pub view: String,
}

/// Any one of the statement kinds the dispatcher routes to (spec §4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    DropTable(DropTableStatement),
    CreateView(CreateViewStatement),
    DropView(DropViewStatement),
    /// `help` — external, deliberately minimal (spec §1).
    Help,
    /// `print name` — external, deliberately minimal: rendered as a
    /// width-padded `SELECT * FROM name` (spec §1, §4.4).
    Print(String),
}
