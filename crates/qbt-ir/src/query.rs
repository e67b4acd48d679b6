use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::data_type::DataType;
use crate::eval::EvalNode;
use crate::metadata::TableDesc;

/// One resolved FROM-clause table (§3). `effective_name` is what the rest of
/// the scope must use to refer to it — the alias when present, else the
/// catalog table id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromTable {
    pub desc: TableDesc,
    pub alias: Option<String>,
}

impl FromTable {
    pub fn new(desc: TableDesc, alias: Option<String>) -> Self {
        Self { desc, alias }
    }

    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.desc.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Natural,
    Inner,
    LeftOuter,
    RightOuter,
    Cross,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JoinQualifier {
    On(EvalNode),
    Using(Vec<String>),
}

/// The right side of a join step: either another table, or a nested join
/// clause for left-deep chains of more than two tables (§4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JoinRight {
    Table(FromTable),
    Nested(Box<JoinClause>),
}

/// A left-deep join tree (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub left: FromTable,
    pub right: JoinRight,
    pub qualifier: Option<JoinQualifier>,
}

/// Either a flat list of FROM tables (no explicit joins) or a join tree (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FromClause {
    Tables(Vec<FromTable>),
    Join(JoinClause),
}

impl FromClause {
    /// Every table reachable from this FROM clause, left to right.
    pub fn tables(&self) -> Vec<&FromTable> {
        match self {
            FromClause::Tables(tables) => tables.iter().collect(),
            FromClause::Join(join) => {
                let mut out = vec![&join.left];
                Self::join_right_tables(&join.right, &mut out);
                out
            }
        }
    }

    fn join_right_tables<'a>(right: &'a JoinRight, out: &mut Vec<&'a FromTable>) {
        match right {
            JoinRight::Table(t) => out.push(t),
            JoinRight::Nested(j) => {
                out.push(&j.left);
                Self::join_right_tables(&j.right, out);
            }
        }
    }
}

/// One projected expression in a SELECT list (§3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub expr: EvalNode,
    pub index: i32,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupElementKind {
    GroupBy,
    Cube,
    Rollup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupElement {
    pub kind: GroupElementKind,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupByClause {
    pub empty_grouping_set: bool,
    pub groups: Vec<GroupElement>,
}

/// One ORDER BY term. Defaults: ascending, nulls-last (§3, §8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub descending: bool,
    pub nulls_first: bool,
}

impl SortSpec {
    pub fn new(column: Column) -> Self {
        Self { column, descending: false, nulls_first: false }
    }
}

/// A single SELECT scope (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryBlock {
    pub from: Option<FromClause>,
    pub where_clause: Option<EvalNode>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<EvalNode>,
    pub sort_specs: Option<Vec<SortSpec>>,
    pub targets: Option<Vec<Target>>,
    pub project_all: bool,
    pub distinct: bool,
    pub is_aggregation: bool,
}

impl QueryBlock {
    pub fn input_table_names(&self) -> Vec<String> {
        self.from
            .as_ref()
            .map(|f| f.tables().iter().map(|t| t.effective_name().to_string()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

/// `UNION`/`INTERSECT`/`EXCEPT` (§3, §4.7). `distinct` preserves the
/// source's inverted ALL/DISTINCT meaning verbatim — see §9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStmt {
    pub kind: SetOpKind,
    pub left: Box<ParseTree>,
    pub right: Box<ParseTree>,
    pub distinct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexMethod {
    TwoLevelBinTree,
    BTree,
    Hash,
    Bitmap,
}

impl IndexMethod {
    /// §4.8's method-string mapping. `None` for any other token — callers
    /// turn that into a syntax error.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "bst" => Some(IndexMethod::TwoLevelBinTree),
            "btree" => Some(IndexMethod::BTree),
            "hash" => Some(IndexMethod::Hash),
            "bitmap" => Some(IndexMethod::Bitmap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndexStmt {
    pub name: String,
    pub unique: bool,
    pub table: String,
    pub sort_specs: Vec<SortSpec>,
    pub method: Option<IndexMethod>,
    pub params: Option<BTreeMap<String, String>>,
}

/// `CREATE TABLE`, either the schema-backed form or CTAS (§3, §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CreateTableStmt {
    WithSchema {
        name: String,
        schema: Vec<ColumnDef>,
        store_kind: String,
        path: String,
        options: Option<BTreeMap<String, String>>,
    },
    Ctas {
        name: String,
        select: Box<QueryBlock>,
    },
}

/// The analyzer's output root (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParseTree {
    QueryBlock(QueryBlock),
    SetStmt(SetStmt),
    CreateTable(CreateTableStmt),
    CreateIndex(CreateIndexStmt),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_name_falls_back_to_table_id() {
        let desc = TableDesc::new("t", vec![]);
        let from = FromTable::new(desc, None);
        assert_eq!(from.effective_name(), "t");
    }

    #[test]
    fn effective_name_prefers_alias() {
        let desc = TableDesc::new("t", vec![]);
        let from = FromTable::new(desc, Some("x".to_string()));
        assert_eq!(from.effective_name(), "x");
    }

    #[test]
    fn sort_spec_defaults_ascending_nulls_last() {
        let spec = SortSpec::new(Column::new("t", "a", DataType::Int));
        assert!(!spec.descending);
        assert!(!spec.nulls_first);
    }

    #[test]
    fn index_method_parses_known_tokens() {
        assert_eq!(IndexMethod::parse("btree"), Some(IndexMethod::BTree));
        assert_eq!(IndexMethod::parse("BST"), Some(IndexMethod::TwoLevelBinTree));
        assert_eq!(IndexMethod::parse("gist"), None);
    }

    #[test]
    fn from_clause_join_lists_tables_left_to_right() {
        let t1 = FromTable::new(TableDesc::new("t1", vec![]), None);
        let t2 = FromTable::new(TableDesc::new("t2", vec![]), None);
        let join = JoinClause { kind: JoinKind::Inner, left: t1, right: JoinRight::Table(t2), qualifier: None };
        let clause = FromClause::Join(join);
        let names: Vec<_> = clause.tables().iter().map(|t| t.effective_name().to_string()).collect();
        assert_eq!(names, vec!["t1", "t2"]);
    }
}
