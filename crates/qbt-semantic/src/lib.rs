//! Translates a parsed SQL AST into a semantically-typed Query Block Tree.
//!
//! The entrypoint is [`analyze`]: given a root [`AstNode`] and a read-only
//! [`Catalog`], it returns the resolved [`ParseTree`] (or `None` for
//! statements that are classified but not otherwise analyzed) together with
//! the final [`Context`] accumulated during analysis.

mod context;
mod error;
mod expr;
mod statement;

use std::sync::Arc;

use qbt_ast::AstNode;
use qbt_catalog::Catalog;
use qbt_ir::ParseTree;
use tracing::instrument;

pub use context::{Context, OrderedTableSet};
pub use error::{SemanticError, SemanticResult};

/// Analyze a root statement against `catalog`, returning the resolved tree
/// (`None` for statements that are classified-only, e.g. STORE/INSERT/
/// DROP_TABLE/SHOW_*/DESC_TABLE) and the accumulated `Context`.
#[instrument(skip(ast, catalog))]
pub fn analyze(ast: &AstNode, catalog: Arc<dyn Catalog>) -> SemanticResult<(Option<ParseTree>, Context)> {
    let mut ctx = Context::new(catalog);
    let tree = statement::analyze_statement(ast, &mut ctx)?;
    Ok((tree, ctx))
}
