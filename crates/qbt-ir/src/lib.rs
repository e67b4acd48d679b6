//! The Query Block Tree: the semantic analyzer's output representation.
//!
//! This crate has no knowledge of parsing or catalogs — it is the shared
//! vocabulary between the analyzer (`qbt-semantic`), the schema service it
//! consumes (`qbt-catalog`), and anything downstream that walks a [`ParseTree`].

mod column;
mod data_type;
mod datum;
mod eval;
mod metadata;
mod query;

pub use column::Column;
pub use data_type::DataType;
pub use datum::Datum;
pub use eval::{BinaryOp, EvalNode};
pub use metadata::{
    FunctionDesc, FunctionInstantiationError, FunctionType, Schema, TableDesc, TableMeta,
};
pub use query::{
    ColumnDef, CreateIndexStmt, CreateTableStmt, FromClause, FromTable, GroupByClause,
    GroupElement, GroupElementKind, IndexMethod, JoinClause, JoinKind, JoinQualifier, JoinRight,
    ParseTree, QueryBlock, SetOpKind, SetStmt, SortSpec, Target,
};
