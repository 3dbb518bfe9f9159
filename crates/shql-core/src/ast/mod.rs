//! Abstract syntax tree types for every statement kind this engine parses.

mod expr;
mod statement;

pub use expr::{CompareOp, CompareValue, Literal, WhereExpr};
pub use statement::{
    AggFunc, Assignment, ColumnDef, CreateTableStatement, CreateViewStatement, DeleteStatement,
    DropTableStatement, DropViewStatement, InsertStatement, OrderByItem, OrderDirection,
    SelectColumn, SelectStatement, Statement, UpdateStatement, ViewJoin,
};
