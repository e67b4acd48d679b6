//! Statement Dispatcher, clause analyzers, and the Join Analyzer
//! (§4.1-§4.10).

use std::collections::BTreeMap;

use qbt_ast::{AstKind, AstNode};
use qbt_ir::{
    Column, ColumnDef, CreateIndexStmt, CreateTableStmt, DataType, FromClause, FromTable,
    GroupByClause, GroupElement, GroupElementKind, IndexMethod, JoinClause, JoinKind,
    JoinQualifier, JoinRight, ParseTree, QueryBlock, SetOpKind, SetStmt, SortSpec, Target,
};
use tracing::instrument;

use crate::context::Context;
use crate::error::{SemanticError, SemanticResult};
use crate::expr::{build_eval, resolve_field};

/// Top-level classifier (§4.1). Returns `None` for AST kinds that are
/// recognized but carry no analyzer beyond classification (STORE, INSERT,
/// DROP_TABLE, SHOW_*, DESC_TABLE) — "analysis returns null tree".
#[instrument(skip(node, ctx), fields(kind = ?node.kind))]
pub fn analyze_statement(node: &AstNode, ctx: &mut Context) -> SemanticResult<Option<ParseTree>> {
    let tree = match node.kind {
        AstKind::Select => Some(ParseTree::QueryBlock(analyze_select(node, ctx)?)),
        AstKind::Union | AstKind::Intersect | AstKind::Except => Some(analyze_set_stmt(node, ctx)?),
        AstKind::CreateIndex => Some(analyze_create_index(node, ctx)?),
        AstKind::CreateTable => Some(analyze_create_table(node, ctx)?),
        AstKind::Store
        | AstKind::Insert
        | AstKind::DropTable
        | AstKind::ShowTables
        | AstKind::ShowFunctions
        | AstKind::DescTable => None,
        AstKind::Unknown => return Err(SemanticError::nql_syntax("unrecognized statement (kind 0)")),
        other => return Err(SemanticError::nql_syntax(format!("unrecognized statement kind {other:?}"))),
    };
    if let Some(tree) = &tree {
        ctx.make_hints(tree);
    }
    Ok(tree)
}

/// SELECT Analyzer (§4.2): a two-pass traversal. FROM is analyzed first
/// regardless of AST position; the remaining clauses are then analyzed in
/// their original AST order, since only FROM populates the input-table set
/// column resolution depends on.
fn analyze_select(node: &AstNode, ctx: &mut Context) -> SemanticResult<QueryBlock> {
    let mut block = QueryBlock::default();

    for child in &node.children {
        if child.kind == AstKind::From {
            analyze_from(child, ctx, &mut block)?;
        }
    }

    for child in &node.children {
        match child.kind {
            AstKind::From => {}
            AstKind::SetQualifier => analyze_set_qualifier(child, &mut block),
            AstKind::SelList => analyze_sel_list(child, ctx, &mut block)?,
            AstKind::Where => {
                let expr_node = child
                    .first_child()
                    .ok_or_else(|| SemanticError::invalid_query_at("WHERE missing expression", child))?;
                block.where_clause = Some(build_eval(expr_node, ctx)?);
            }
            AstKind::GroupBy => analyze_group_by(child, ctx, &mut block)?,
            AstKind::Having => {
                let expr_node = child
                    .first_child()
                    .ok_or_else(|| SemanticError::invalid_query_at("HAVING missing expression", child))?;
                block.having = Some(build_eval(expr_node, ctx)?);
            }
            AstKind::OrderBy => analyze_order_by(child, ctx, &mut block)?,
            other => return Err(SemanticError::invalid_query_at(format!("unrecognized SELECT clause {other:?}"), child)),
        }
    }

    block.is_aggregation = block_contains_aggregate(&block);
    Ok(block)
}

fn block_contains_aggregate(block: &QueryBlock) -> bool {
    let in_targets = block
        .targets
        .as_ref()
        .is_some_and(|targets| targets.iter().any(|t| t.expr.contains_aggregate()));
    let in_having = block.having.as_ref().is_some_and(|h| h.contains_aggregate());
    in_targets || in_having
}

/// FROM Analyzer (§4.3).
fn analyze_from(node: &AstNode, ctx: &mut Context, block: &mut QueryBlock) -> SemanticResult<()> {
    if let Some(first) = node.first_child() {
        if first.kind == AstKind::Join {
            block.from = Some(FromClause::Join(analyze_join(first, ctx)?));
            return Ok(());
        }
    }

    let mut tables = Vec::new();
    for child in &node.children {
        if child.kind != AstKind::Table {
            return Err(SemanticError::invalid_query_at("expected TABLE in FROM", child));
        }
        tables.push(resolve_from_table(child, ctx)?);
    }
    block.from = Some(FromClause::Tables(tables));
    Ok(())
}

fn resolve_from_table(table_node: &AstNode, ctx: &mut Context) -> SemanticResult<FromTable> {
    let table_name = table_node.text.clone();
    let alias = table_node
        .children
        .iter()
        .find(|c| c.kind == AstKind::Alias)
        .map(|a| a.text.clone());
    let effective = alias.clone().unwrap_or_else(|| table_name.clone());
    ctx.rename_table(&table_name, &effective);
    let desc = ctx.get_table(&effective)?;
    Ok(FromTable::new(desc, alias))
}

fn analyze_set_qualifier(node: &AstNode, block: &mut QueryBlock) {
    if let Some(child) = node.first_child() {
        block.distinct = child.kind == AstKind::Distinct;
    }
}

/// SELECT List (§4.4).
fn analyze_sel_list(node: &AstNode, ctx: &mut Context, block: &mut QueryBlock) -> SemanticResult<()> {
    if let [only] = node.children.as_slice() {
        if only.kind == AstKind::Wildcard {
            block.project_all = true;
            return Ok(());
        }
    }

    let mut targets = Vec::with_capacity(node.children.len());
    for (index, derived) in node.children.iter().enumerate() {
        if derived.kind != AstKind::DerivedColumn {
            return Err(SemanticError::invalid_query_at("expected a derived column", derived));
        }
        let (expr_node, alias) = match derived.children.as_slice() {
            [expr] => (expr, None),
            [expr, alias_node] if alias_node.kind == AstKind::Alias => {
                (expr, alias_node.first_child().map(|n| n.text.clone()))
            }
            _ => return Err(SemanticError::invalid_query_at("malformed derived column", derived)),
        };
        let expr = build_eval(expr_node, ctx)?;
        targets.push(Target { expr, index: index as i32, alias });
    }
    block.targets = Some(targets);
    Ok(())
}

fn resolve_columns(nodes: &[AstNode], ctx: &mut Context) -> SemanticResult<Vec<Column>> {
    nodes.iter().map(|n| resolve_field(n, ctx)).collect()
}

/// GROUP BY (§4.6).
fn analyze_group_by(node: &AstNode, ctx: &mut Context, block: &mut QueryBlock) -> SemanticResult<()> {
    let mut clause = GroupByClause::default();

    if let Some(first) = node.first_child() {
        if first.kind == AstKind::EmptyGroupingSet {
            clause.empty_grouping_set = true;
            block.group_by = Some(clause);
            return Ok(());
        }
    }

    let mut trailing = Vec::new();
    for child in &node.children {
        match child.kind {
            AstKind::Cube => {
                let columns = resolve_columns(&child.children, ctx)?;
                clause.groups.push(GroupElement { kind: GroupElementKind::Cube, columns });
            }
            AstKind::Rollup => {
                let columns = resolve_columns(&child.children, ctx)?;
                clause.groups.push(GroupElement { kind: GroupElementKind::Rollup, columns });
            }
            AstKind::FieldName => trailing.push(resolve_field(child, ctx)?),
            other => return Err(SemanticError::invalid_query_at(format!("unrecognized GROUP BY element {other:?}"), child)),
        }
    }
    if !trailing.is_empty() {
        clause.groups.push(GroupElement { kind: GroupElementKind::GroupBy, columns: trailing });
    }
    block.group_by = Some(clause);
    Ok(())
}

fn analyze_order_by(node: &AstNode, ctx: &mut Context, block: &mut QueryBlock) -> SemanticResult<()> {
    let mut specs = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if child.kind != AstKind::SortSpecifier {
            return Err(SemanticError::invalid_query_at("expected a sort specifier", child));
        }
        let field_node = child
            .first_child()
            .ok_or_else(|| SemanticError::invalid_query_at("sort specifier missing column", child))?;
        let mut spec = SortSpec::new(resolve_field(field_node, ctx)?);
        for modifier in &child.children[1..] {
            match modifier.kind {
                AstKind::Desc => spec.descending = true,
                AstKind::Asc => {}
                AstKind::NullsFirst => spec.nulls_first = true,
                AstKind::NullsLast => {}
                other => return Err(SemanticError::invalid_query_at(format!("unrecognized sort modifier {other:?}"), modifier)),
            }
        }
        specs.push(spec);
    }
    block.sort_specs = Some(specs);
    Ok(())
}

/// Join Analyzer (§4.10): left-deep construction.
fn analyze_join(node: &AstNode, ctx: &mut Context) -> SemanticResult<JoinClause> {
    let kind_marker = node
        .first_child()
        .ok_or_else(|| SemanticError::invalid_query_at("JOIN missing kind marker", node))?;
    let kind = match kind_marker.kind {
        AstKind::NaturalJoin => JoinKind::Natural,
        AstKind::InnerJoin => JoinKind::Inner,
        AstKind::CrossJoin => JoinKind::Cross,
        AstKind::OuterJoin => {
            let direction = kind_marker
                .first_child()
                .ok_or_else(|| SemanticError::invalid_query_at("OUTER JOIN missing LEFT/RIGHT", kind_marker))?;
            match direction.kind {
                AstKind::Left => JoinKind::LeftOuter,
                AstKind::Right => JoinKind::RightOuter,
                other => return Err(SemanticError::invalid_query_at(format!("unexpected OUTER JOIN direction {other:?}"), direction)),
            }
        }
        other => return Err(SemanticError::invalid_query_at(format!("unrecognized join kind {other:?}"), kind_marker)),
    };

    let left_node = node
        .child(1)
        .ok_or_else(|| SemanticError::invalid_query_at("JOIN missing left operand", node))?;
    if left_node.kind != AstKind::Table {
        return Err(SemanticError::invalid_query_at("join left operand must be a TABLE", left_node));
    }
    let left = resolve_from_table(left_node, ctx)?;

    let right_node = node
        .child(2)
        .ok_or_else(|| SemanticError::invalid_query_at("JOIN missing right operand", node))?;
    let right = match right_node.kind {
        AstKind::Join => JoinRight::Nested(Box::new(analyze_join(right_node, ctx)?)),
        AstKind::Table => JoinRight::Table(resolve_from_table(right_node, ctx)?),
        other => return Err(SemanticError::invalid_query_at(format!("join right operand must be TABLE or JOIN, found {other:?}"), right_node)),
    };

    let qualifier = match node.child(3) {
        Some(q) if q.kind == AstKind::On => {
            let expr_node = q
                .first_child()
                .ok_or_else(|| SemanticError::invalid_query_at("ON missing expression", q))?;
            Some(JoinQualifier::On(build_eval(expr_node, ctx)?))
        }
        Some(q) if q.kind == AstKind::Using => {
            let cols = resolve_columns(&q.children, ctx)?.into_iter().map(|c| c.name).collect();
            Some(JoinQualifier::Using(cols))
        }
        Some(q) => return Err(SemanticError::invalid_query_at("unrecognized join qualifier", q)),
        None => None,
    };

    if matches!(kind, JoinKind::Natural | JoinKind::Cross) && qualifier.is_some() {
        return Err(SemanticError::invalid_query_at(
            "NATURAL and CROSS joins must not carry a qualifier",
            node,
        ));
    }

    Ok(JoinClause { kind, left, right, qualifier })
}

/// Set Operation Analyzer (§4.7). Left and right are analyzed in
/// independent child contexts, then merged upward. The inverted ALL/DISTINCT
/// meaning is preserved verbatim (§9): ALL sets `distinct = true`, DISTINCT
/// sets `distinct = false`. With no explicit qualifier, `distinct = false`.
fn analyze_set_stmt(node: &AstNode, ctx: &mut Context) -> SemanticResult<ParseTree> {
    let kind = match node.kind {
        AstKind::Union => SetOpKind::Union,
        AstKind::Intersect => SetOpKind::Intersect,
        AstKind::Except => SetOpKind::Except,
        other => unreachable!("analyze_set_stmt called with non-set-op kind {other:?}"),
    };

    let (left_node, qualifier, right_node) = match node.children.as_slice() {
        [l, q, r] if q.kind == AstKind::All || q.kind == AstKind::Distinct => (l, Some(q.kind), r),
        [l, r] => (l, None, r),
        _ => return Err(SemanticError::invalid_query_at("malformed set operation", node)),
    };

    let mut left_ctx = ctx.child();
    let left = analyze_statement(left_node, &mut left_ctx)?
        .ok_or_else(|| SemanticError::invalid_query_at("set operation operand produced no result", left_node))?;

    let mut right_ctx = ctx.child();
    let right = analyze_statement(right_node, &mut right_ctx)?
        .ok_or_else(|| SemanticError::invalid_query_at("set operation operand produced no result", right_node))?;

    ctx.merge_context(left_ctx);
    ctx.merge_context(right_ctx);

    let distinct = matches!(qualifier, Some(AstKind::All));

    Ok(ParseTree::SetStmt(SetStmt { kind, left: Box::new(left), right: Box::new(right), distinct }))
}

/// CREATE INDEX (§4.8).
fn analyze_create_index(node: &AstNode, ctx: &mut Context) -> SemanticResult<ParseTree> {
    let mut idx = 0;
    let mut unique = false;
    if node.children.get(idx).is_some_and(|c| c.kind == AstKind::Unique) {
        unique = true;
        idx += 1;
    }

    let name = node
        .children
        .get(idx)
        .ok_or_else(|| SemanticError::invalid_query_at("CREATE INDEX missing name", node))?
        .text
        .clone();
    idx += 1;

    let table = node
        .children
        .get(idx)
        .ok_or_else(|| SemanticError::invalid_query_at("CREATE INDEX missing table", node))?
        .text
        .clone();
    idx += 1;
    ctx.rename_table(&table, &table);
    ctx.get_table(&table)?;

    let mut method = None;
    if node.children.get(idx).is_some_and(|c| c.kind == AstKind::UsingMethod) {
        let token = &node.children[idx].text;
        method = Some(
            IndexMethod::parse(token)
                .ok_or_else(|| SemanticError::nql_syntax(format!("unknown index method `{token}`")))?,
        );
        idx += 1;
    }

    let mut params = None;
    if node.children.get(idx).is_some_and(|c| c.kind == AstKind::Params) {
        params = Some(parse_params(&node.children[idx]));
        idx += 1;
    }

    let mut sort_specs = Vec::new();
    for child in &node.children[idx..] {
        if child.kind != AstKind::SortSpecifier {
            return Err(SemanticError::invalid_query_at("expected sort specifier in CREATE INDEX", child));
        }
        let field_node = child
            .first_child()
            .ok_or_else(|| SemanticError::invalid_query_at("sort specifier missing column", child))?;
        let mut spec = SortSpec::new(resolve_field(field_node, ctx)?);
        for modifier in &child.children[1..] {
            match modifier.kind {
                AstKind::Desc => spec.descending = true,
                AstKind::Asc => {}
                AstKind::NullsFirst => spec.nulls_first = true,
                AstKind::NullsLast => {}
                other => return Err(SemanticError::invalid_query_at(format!("unrecognized sort modifier {other:?}"), modifier)),
            }
        }
        sort_specs.push(spec);
    }

    Ok(ParseTree::CreateIndex(CreateIndexStmt { name, unique, table, sort_specs, method, params }))
}

fn parse_params(params_node: &AstNode) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for param in &params_node.children {
        if param.kind == AstKind::Param {
            if let [key, value] = param.children.as_slice() {
                map.insert(key.text.clone(), value.text.clone());
            }
        }
    }
    map
}

/// CREATE TABLE (§4.9). Both forms are terminal dispatch cases — unlike the
/// source this is drawn from, there is no fallthrough into the default
/// "unrecognized statement" branch (§9).
fn analyze_create_table(node: &AstNode, ctx: &mut Context) -> SemanticResult<ParseTree> {
    let name = node
        .first_child()
        .ok_or_else(|| SemanticError::invalid_query_at("CREATE TABLE missing name", node))?
        .text
        .clone();
    let body = node
        .child(1)
        .ok_or_else(|| SemanticError::invalid_query_at("CREATE TABLE missing body", node))?;

    match body.kind {
        AstKind::TableDef => {
            let mut schema = Vec::with_capacity(body.children.len());
            let mut seen = std::collections::HashSet::new();
            for column_node in &body.children {
                if column_node.kind != AstKind::ColumnDef {
                    return Err(SemanticError::invalid_query_at("expected a column definition", column_node));
                }
                let col_name = column_node
                    .first_child()
                    .ok_or_else(|| SemanticError::invalid_query_at("column definition missing name", column_node))?
                    .text
                    .clone();
                let type_node = column_node
                    .child(1)
                    .ok_or_else(|| SemanticError::invalid_query_at("column definition missing type", column_node))?;
                let data_type = DataType::parse_schema_token(&type_node.text).ok_or_else(|| {
                    SemanticError::invalid_query_at(format!("unknown column type `{}`", type_node.text), type_node)
                })?;
                if !seen.insert(col_name.clone()) {
                    return Err(SemanticError::invalid_query_at(format!("duplicate column `{col_name}`"), column_node));
                }
                schema.push(ColumnDef { name: col_name, data_type });
            }

            let store_kind = node
                .child(2)
                .ok_or_else(|| SemanticError::invalid_query_at("CREATE TABLE missing store type", node))?
                .text
                .clone();
            let path = node
                .child(3)
                .ok_or_else(|| SemanticError::invalid_query_at("CREATE TABLE missing path", node))?
                .text
                .clone();
            let options = node.child(4).filter(|c| c.kind == AstKind::Params).map(parse_params);

            Ok(ParseTree::CreateTable(CreateTableStmt::WithSchema { name, schema, store_kind, path, options }))
        }
        AstKind::Select => {
            let mut sub_ctx = ctx.child();
            let select = analyze_select(body, &mut sub_ctx)?;
            ctx.merge_context(sub_ctx);
            Ok(ParseTree::CreateTable(CreateTableStmt::Ctas { name, select: Box::new(select) }))
        }
        other => Err(SemanticError::NotSupportQuery { message: format!("unrecognized CREATE TABLE body {other:?}") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbt_catalog::StaticCatalog;
    use qbt_ir::DataType as Ty;
    use std::sync::Arc;

    fn leaf(kind: AstKind, text: &str) -> AstNode {
        AstNode::leaf(kind, text)
    }

    fn table(name: &str, alias: Option<&str>) -> AstNode {
        let children = alias.map(|a| vec![leaf(AstKind::Alias, a)]).unwrap_or_default();
        AstNode::new(AstKind::Table, name, children)
    }

    fn field(name: &str) -> AstNode {
        leaf(AstKind::FieldName, name)
    }

    fn derived(expr: AstNode) -> AstNode {
        AstNode::branch(AstKind::DerivedColumn, vec![expr])
    }

    fn ctx() -> Context {
        Context::new(Arc::new(StaticCatalog::new()))
    }

    #[test]
    fn scenario_1_bare_column_resolves() {
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("users", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("id"))]),
            ],
        );
        let mut c = ctx();
        let block = analyze_select(&select, &mut c).unwrap();
        let targets = block.targets.unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].index, 0);
        assert!(matches!(targets[0].expr, qbt_ir::EvalNode::Field(_)));
        assert!(c.get_input_tables().contains("users"));
    }

    #[test]
    fn scenario_2_ambiguous_bare_column() {
        let catalog = StaticCatalog::new().with_table(qbt_ir::TableDesc::new(
            "t2",
            vec![Column::new("t2", "id", Ty::Int)],
        ));
        let mut c = Context::new(Arc::new(catalog));
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("users", None), table("t2", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("id"))]),
            ],
        );
        let err = analyze_select(&select, &mut c).unwrap_err();
        assert!(matches!(err, SemanticError::AmbiguousField { .. }));
    }

    #[test]
    fn scenario_3_type_inferred_comparison_preserves_order() {
        let mut c = ctx();
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("orders", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("id"))]),
                AstNode::branch(
                    AstKind::Where,
                    vec![AstNode::branch(AstKind::Eq, vec![field("id"), leaf(AstKind::Digit, "3")])],
                ),
            ],
        );
        let block = analyze_select(&select, &mut c).unwrap();
        match block.where_clause.unwrap() {
            qbt_ir::EvalNode::Binary(qbt_ir::BinaryOp::Eq, lhs, rhs) => {
                assert!(matches!(*lhs, qbt_ir::EvalNode::Field(_)));
                assert!(matches!(*rhs, qbt_ir::EvalNode::Const(..)));
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn scenario_4_left_outer_join_with_on() {
        let mut c = Context::new(Arc::new(StaticCatalog::new().with_table(qbt_ir::TableDesc::new(
            "t1",
            vec![Column::new("t1", "id", Ty::Int)],
        )).with_table(qbt_ir::TableDesc::new(
            "t2",
            vec![Column::new("t2", "id", Ty::Int)],
        ))));

        let join = AstNode::branch(
            AstKind::Join,
            vec![
                leaf(AstKind::OuterJoin, ""),
                table("t1", None),
                table("t2", None),
            ],
        );
        // patch kind marker to carry LEFT direction
        let mut join = join;
        join.children[0] = AstNode::branch(AstKind::OuterJoin, vec![leaf(AstKind::Left, "")]);
        join.children.push(AstNode::branch(
            AstKind::On,
            vec![AstNode::branch(
                AstKind::Eq,
                vec![
                    AstNode::new(AstKind::FieldName, "id", vec![leaf(AstKind::TableQualifier, "t1")]),
                    AstNode::new(AstKind::FieldName, "id", vec![leaf(AstKind::TableQualifier, "t2")]),
                ],
            )],
        ));

        let clause = analyze_join(&join, &mut c).unwrap();
        assert_eq!(clause.kind, JoinKind::LeftOuter);
        assert!(matches!(clause.qualifier, Some(JoinQualifier::On(_))));
        assert!(c.get_input_tables().contains("t1"));
        assert!(c.get_input_tables().contains("t2"));
    }

    #[test]
    fn scenario_5_union_all_inverts_to_distinct_true() {
        let mut c = ctx();
        let left = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("users", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("id"))]),
            ],
        );
        let right = left.clone();
        let union = AstNode::branch(AstKind::Union, vec![left, leaf(AstKind::All, ""), right]);
        let tree = analyze_statement(&union, &mut c).unwrap().unwrap();
        match tree {
            ParseTree::SetStmt(stmt) => {
                assert_eq!(stmt.kind, SetOpKind::Union);
                assert!(stmt.distinct);
            }
            _ => panic!("expected set stmt"),
        }
    }

    #[test]
    fn scenario_6_create_index_with_options() {
        let mut c = ctx();
        let create = AstNode::branch(
            AstKind::CreateIndex,
            vec![
                leaf(AstKind::Unique, ""),
                leaf(AstKind::Other("name"), "i"),
                leaf(AstKind::Other("name"), "users"),
                leaf(AstKind::UsingMethod, "btree"),
                AstNode::branch(
                    AstKind::Params,
                    vec![AstNode::branch(
                        AstKind::Param,
                        vec![leaf(AstKind::Other("key"), "fill"), leaf(AstKind::Other("val"), "0.8")],
                    )],
                ),
                AstNode::branch(AstKind::SortSpecifier, vec![field("id")]),
                AstNode::branch(AstKind::SortSpecifier, vec![field("username"), leaf(AstKind::Desc, ""), leaf(AstKind::NullsFirst, "")]),
            ],
        );
        let tree = analyze_statement(&create, &mut c).unwrap().unwrap();
        match tree {
            ParseTree::CreateIndex(stmt) => {
                assert!(stmt.unique);
                assert_eq!(stmt.method, Some(IndexMethod::BTree));
                assert_eq!(stmt.sort_specs.len(), 2);
                assert!(!stmt.sort_specs[0].descending);
                assert!(stmt.sort_specs[1].descending);
                assert!(stmt.sort_specs[1].nulls_first);
                assert_eq!(stmt.params.unwrap().get("fill"), Some(&"0.8".to_string()));
            }
            _ => panic!("expected create index"),
        }
    }

    #[test]
    fn natural_join_with_qualifier_is_rejected() {
        let mut c = Context::new(Arc::new(StaticCatalog::new().with_table(qbt_ir::TableDesc::new(
            "t2",
            vec![Column::new("t2", "id", Ty::Int)],
        ))));
        let join = AstNode::branch(
            AstKind::Join,
            vec![
                leaf(AstKind::NaturalJoin, ""),
                table("users", None),
                table("t2", None),
                AstNode::branch(AstKind::Using, vec![field("id")]),
            ],
        );
        let err = analyze_join(&join, &mut c).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidQuery { .. }));
    }

    #[test]
    fn create_table_with_duplicate_columns_is_rejected() {
        let mut c = ctx();
        let col = |name: &str, ty: &str| {
            AstNode::branch(AstKind::ColumnDef, vec![leaf(AstKind::Other("name"), name), leaf(AstKind::Other("type"), ty)])
        };
        let create = AstNode::branch(
            AstKind::CreateTable,
            vec![
                leaf(AstKind::Other("name"), "t"),
                AstNode::branch(AstKind::TableDef, vec![col("a", "INT"), col("a", "LONG")]),
                leaf(AstKind::StoreType, "csv"),
                leaf(AstKind::Path, "/tmp/t"),
            ],
        );
        let err = analyze_statement(&create, &mut c).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidQuery { .. }));
    }

    #[test]
    fn create_table_unknown_type_is_invalid_query() {
        let mut c = ctx();
        let col = |name: &str, ty: &str| {
            AstNode::branch(AstKind::ColumnDef, vec![leaf(AstKind::Other("name"), name), leaf(AstKind::Other("type"), ty)])
        };
        let create = AstNode::branch(
            AstKind::CreateTable,
            vec![
                leaf(AstKind::Other("name"), "t"),
                AstNode::branch(AstKind::TableDef, vec![col("a", "DECIMAL")]),
                leaf(AstKind::StoreType, "csv"),
                leaf(AstKind::Path, "/tmp/t"),
            ],
        );
        let err = analyze_statement(&create, &mut c).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidQuery { .. }));
    }

    #[test]
    fn unknown_top_level_kind_is_fatal_syntax_error() {
        let mut c = ctx();
        let node = AstNode::branch(AstKind::Unknown, vec![]);
        let err = analyze_statement(&node, &mut c).unwrap_err();
        assert!(matches!(err, SemanticError::NqlSyntax { .. }));
    }

    #[test]
    fn classified_only_statement_returns_null_tree() {
        let mut c = ctx();
        let node = AstNode::branch(AstKind::DropTable, vec![]);
        let tree = analyze_statement(&node, &mut c).unwrap();
        assert!(tree.is_none());
    }

    #[test]
    fn wildcard_select_sets_project_all() {
        let mut c = ctx();
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("users", None)]),
                AstNode::branch(AstKind::SelList, vec![leaf(AstKind::Wildcard, "*")]),
            ],
        );
        let block = analyze_select(&select, &mut c).unwrap();
        assert!(block.project_all);
        assert!(block.targets.is_none());
    }

    #[test]
    fn group_by_with_trailing_fields_accumulates_one_element() {
        let mut c = ctx();
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("orders", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("user_id"))]),
                AstNode::branch(AstKind::GroupBy, vec![field("user_id"), field("status")]),
            ],
        );
        let block = analyze_select(&select, &mut c).unwrap();
        let groups = &block.group_by.unwrap().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, GroupElementKind::GroupBy);
        assert_eq!(groups[0].columns.len(), 2);
    }

    #[test]
    fn empty_grouping_set_flag_without_elements() {
        let mut c = ctx();
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("orders", None)]),
                AstNode::branch(AstKind::SelList, vec![derived(field("user_id"))]),
                AstNode::branch(AstKind::GroupBy, vec![leaf(AstKind::EmptyGroupingSet, "")]),
            ],
        );
        let block = analyze_select(&select, &mut c).unwrap();
        let group_by = block.group_by.unwrap();
        assert!(group_by.empty_grouping_set);
        assert!(group_by.groups.is_empty());
    }

    #[test]
    fn alias_collapses_input_tables_to_effective_name() {
        let mut c = ctx();
        let select = AstNode::branch(
            AstKind::Select,
            vec![
                AstNode::branch(AstKind::From, vec![table("users", Some("u"))]),
                AstNode::branch(AstKind::SelList, vec![leaf(AstKind::Wildcard, "*")]),
            ],
        );
        let _ = analyze_select(&select, &mut c).unwrap();
        assert!(c.get_input_tables().contains("u"));
        assert!(!c.get_input_tables().contains("users"));
    }
}
