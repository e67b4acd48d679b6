use thiserror::Error;

use qbt_ast::AstNode;

/// The analyzer's diagnostic taxonomy (§7). All errors abort the current
/// analysis; there is no in-analyzer recovery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SemanticError {
    /// Parser failure, a top-level AST node of kind 0/Unknown, or an
    /// unrecognized CREATE INDEX method string.
    #[error("syntax error: {message}")]
    NqlSyntax { message: String },

    /// CREATE TABLE with an unrecognized body shape.
    #[error("query type not supported: {message}")]
    NotSupportQuery { message: String },

    /// Unknown type in a schema, unknown table, unknown column, a
    /// NATURAL/CROSS join carrying a qualifier, or malformed AST shape.
    #[error("invalid query: {message}")]
    InvalidQuery { message: String, ast_text: Option<String> },

    /// A bare column reference matched two or more input tables.
    #[error("ambiguous field reference: {name}")]
    AmbiguousField { name: String },

    /// No catalog function signature matches `(name, arg_types)`.
    #[error("undefined function: {canonical}")]
    UndefinedFunction { canonical: String },

    /// A binary operand required to be a literal or FIELD_NAME was neither.
    #[error("invalid expression: {message}")]
    InvalidEval { message: String, ast_text: Option<String> },
}

pub type SemanticResult<T> = Result<T, SemanticError>;

impl SemanticError {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        SemanticError::InvalidQuery { message: message.into(), ast_text: None }
    }

    pub fn invalid_query_at(message: impl Into<String>, node: &AstNode) -> Self {
        let ast_text = (!node.text.is_empty()).then(|| node.text.clone());
        SemanticError::InvalidQuery { message: message.into(), ast_text }
    }

    pub fn invalid_eval(message: impl Into<String>, node: &AstNode) -> Self {
        let ast_text = (!node.text.is_empty()).then(|| node.text.clone());
        SemanticError::InvalidEval { message: message.into(), ast_text }
    }

    pub fn nql_syntax(message: impl Into<String>) -> Self {
        SemanticError::NqlSyntax { message: message.into() }
    }
}
