//! The AST contract the semantic analyzer consumes.
//!
//! A parser (out of scope for this workspace) hands the analyzer a tree of
//! [`AstNode`]: a node `kind`, its raw lexeme `text`, and an ordered list of
//! children. This crate owns only that contract — it performs no parsing and
//! depends on nothing else in the workspace.

use serde::{Deserialize, Serialize};

/// Every grammar token the semantic analyzer is prepared to dispatch on.
///
/// Kinds not listed here are represented by [`AstKind::Other`] and are
/// either classified-only (§4.1's STORE/INSERT/DROP_TABLE/SHOW_*/DESC_TABLE
/// row) or rejected with a fatal syntax error depending on where they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AstKind {
    Select,
    From,
    Table,
    Alias,
    SetQualifier,
    Distinct,
    All,
    SelList,
    DerivedColumn,
    Wildcard,
    Where,
    GroupBy,
    Having,
    OrderBy,
    EmptyGroupingSet,
    Cube,
    Rollup,
    SortSpecifier,
    Asc,
    Desc,
    NullsFirst,
    NullsLast,

    Join,
    NaturalJoin,
    InnerJoin,
    CrossJoin,
    OuterJoin,
    Left,
    Right,
    On,
    Using,

    Union,
    Intersect,
    Except,

    CreateIndex,
    CreateTable,
    TableDef,
    ColumnDef,
    Params,
    Param,
    StoreType,
    Path,
    UsingMethod,
    Unique,

    Digit,
    Real,
    String,
    Not,
    Like,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Column,
    FieldName,
    TableQualifier,
    Function,
    FunctionName,
    Arg,
    CountVal,
    CountRows,
    Case,
    When,
    Else,

    Store,
    Insert,
    DropTable,
    ShowTables,
    ShowFunctions,
    DescTable,

    /// Sentinel for "no node" / kind 0 in the source grammar. A top-level
    /// node of this kind is a fatal `NQLSyntax` error.
    Unknown,
    /// Any recognized-but-not-enumerated-above token. Carried as a string so
    /// call sites can still branch on it without the enum needing to be
    /// exhaustive over every grammar extension.
    Other(&'static str),
}

/// A single AST node: `kind`, raw `text`, and ordered `children`.
///
/// This is the entirety of the parser/analyzer boundary (§6): the analyzer
/// never looks past these three fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: AstKind,
    pub text: String,
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// A leaf node carrying only a kind and its lexeme.
    pub fn leaf(kind: AstKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), children: Vec::new() }
    }

    /// An interior node with no lexeme of its own.
    pub fn branch(kind: AstKind, children: Vec<AstNode>) -> Self {
        Self { kind, text: String::new(), children }
    }

    /// An interior node carrying both a lexeme and children.
    pub fn new(kind: AstKind, text: impl Into<String>, children: Vec<AstNode>) -> Self {
        Self { kind, text: text.into(), children }
    }

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.children.get(index)
    }

    pub fn first_child(&self) -> Option<&AstNode> {
        self.children.first()
    }

    pub fn last_child(&self) -> Option<&AstNode> {
        self.children.last()
    }

    /// True when the node carries no lexeme, i.e. it only groups children.
    pub fn is_empty_text(&self) -> bool {
        self.text.is_empty()
    }
}
