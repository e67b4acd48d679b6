//! Expression Builder (§4.11-§4.15): converts an expression AST subtree into
//! a typed [`EvalNode`].

use qbt_ast::{AstKind, AstNode};
use qbt_ir::{BinaryOp, Column, DataType, Datum, EvalNode, FunctionType};

use crate::context::Context;
use crate::error::{SemanticError, SemanticResult};

fn is_literal_kind(kind: AstKind) -> bool {
    matches!(kind, AstKind::Digit | AstKind::Real | AstKind::String)
}

fn binary_op_for(kind: AstKind) -> Option<BinaryOp> {
    match kind {
        AstKind::And => Some(BinaryOp::And),
        AstKind::Or => Some(BinaryOp::Or),
        AstKind::Eq => Some(BinaryOp::Eq),
        AstKind::NotEq => Some(BinaryOp::NotEq),
        AstKind::Lt => Some(BinaryOp::Lt),
        AstKind::LtEq => Some(BinaryOp::LtEq),
        AstKind::Gt => Some(BinaryOp::Gt),
        AstKind::GtEq => Some(BinaryOp::GtEq),
        AstKind::Plus => Some(BinaryOp::Plus),
        AstKind::Minus => Some(BinaryOp::Minus),
        AstKind::Mul => Some(BinaryOp::Mul),
        AstKind::Div => Some(BinaryOp::Div),
        AstKind::Mod => Some(BinaryOp::Mod),
        _ => None,
    }
}

/// Build an `EvalNode` for any expression-shaped AST node (§4.11's dispatch
/// table).
pub fn build_eval(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    match node.kind {
        AstKind::Digit => {
            let v: i32 = node.text.parse().map_err(|_| SemanticError::invalid_eval(
                format!("not an integer literal: {}", node.text),
                node,
            ))?;
            Ok(EvalNode::Const(Datum::Int(v), DataType::Int))
        }
        AstKind::Real => {
            let v: f64 = node.text.parse().map_err(|_| SemanticError::invalid_eval(
                format!("not a real literal: {}", node.text),
                node,
            ))?;
            Ok(EvalNode::Const(Datum::Double(v), DataType::Double))
        }
        AstKind::String => Ok(EvalNode::Const(Datum::Text(node.text.clone()), DataType::Text)),
        AstKind::Not => {
            let inner = node
                .first_child()
                .ok_or_else(|| SemanticError::invalid_eval("NOT missing operand", node))?;
            Ok(EvalNode::Not(Box::new(build_eval(inner, ctx)?)))
        }
        AstKind::Like => build_like(node, ctx),
        _ if binary_op_for(node.kind).is_some() => build_binary(node, ctx),
        AstKind::Column => {
            let inner = node
                .first_child()
                .ok_or_else(|| SemanticError::invalid_eval("COLUMN missing operand", node))?;
            build_eval(inner, ctx)
        }
        AstKind::FieldName => Ok(EvalNode::Field(resolve_field(node, ctx)?)),
        AstKind::Function => build_function_call(node, ctx),
        AstKind::CountVal => build_count_val(node, ctx),
        AstKind::CountRows => build_count_rows(node, ctx),
        AstKind::Case => build_case(node, ctx),
        _ => Err(SemanticError::invalid_eval(
            format!("unsupported expression node {:?}", node.kind),
            node,
        )),
    }
}

/// Column Resolution (§4.14).
pub fn resolve_field(node: &AstNode, ctx: &Context) -> SemanticResult<Column> {
    let name = &node.text;
    if let Some(qualifier) = node.children.iter().find(|c| c.kind == AstKind::TableQualifier) {
        let effective = &qualifier.text;
        let desc = ctx.get_table(effective)?;
        let qualified = format!("{}.{}", desc.id, name);
        desc.meta
            .schema
            .get_column(&qualified)
            .cloned()
            .ok_or_else(|| SemanticError::invalid_query_at(format!("column {qualified} does not exist"), node))
    } else {
        let mut matches = Vec::new();
        for effective in ctx.get_input_tables().iter() {
            if let Ok(desc) = ctx.get_table(effective) {
                let qualified = format!("{}.{}", desc.id, name);
                if let Some(col) = desc.meta.schema.get_column(&qualified) {
                    matches.push(col.clone());
                }
            }
        }
        match matches.len() {
            0 => Err(SemanticError::invalid_query_at(format!("column {name} does not exist"), node)),
            1 => Ok(matches.remove(0)),
            _ => Err(SemanticError::AmbiguousField { name: name.clone() }),
        }
    }
}

/// LIKE (§4.12).
fn build_like(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let (not, field_node, pattern_node) = match node.children.as_slice() {
        [first, field, pattern] if first.kind == AstKind::Not => (true, field, pattern),
        [field, pattern] => (false, field, pattern),
        _ => return Err(SemanticError::invalid_eval("malformed LIKE", node)),
    };

    let field = build_eval(field_node, ctx)?;
    if !matches!(field, EvalNode::Field(_)) {
        return Err(SemanticError::invalid_eval("LIKE left operand must be a field", field_node));
    }
    let pattern = build_eval(pattern_node, ctx)?;
    if !matches!(pattern, EvalNode::Const(Datum::Text(_), _)) {
        return Err(SemanticError::invalid_eval("LIKE pattern must be a string constant", pattern_node));
    }
    Ok(EvalNode::Like { not, field: Box::new(field), pattern: Box::new(pattern) })
}

/// Binary with constant-type inference (§4.13).
fn build_binary(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let op = binary_op_for(node.kind).expect("caller checked binary_op_for");
    let (lhs_ast, rhs_ast) = match node.children.as_slice() {
        [l, r] => (l, r),
        _ => return Err(SemanticError::invalid_eval("binary operator requires two operands", node)),
    };

    let lhs_lit = is_literal_kind(lhs_ast.kind);
    let rhs_lit = is_literal_kind(rhs_ast.kind);
    let lhs_field = lhs_ast.kind == AstKind::FieldName;
    let rhs_field = rhs_ast.kind == AstKind::FieldName;

    let (lhs, rhs) = if lhs_lit && rhs_field && !rhs_lit {
        let field_col = resolve_field(rhs_ast, ctx)?;
        let constant = build_inferred_const(lhs_ast, field_col.value_type())?;
        (constant, EvalNode::Field(field_col))
    } else if rhs_lit && lhs_field && !lhs_lit {
        let field_col = resolve_field(lhs_ast, ctx)?;
        let constant = build_inferred_const(rhs_ast, field_col.value_type())?;
        (EvalNode::Field(field_col), constant)
    } else {
        (build_eval(lhs_ast, ctx)?, build_eval(rhs_ast, ctx)?)
    };

    Ok(EvalNode::Binary(op, Box::new(lhs), Box::new(rhs)))
}

fn build_inferred_const(lit_node: &AstNode, field_type: DataType) -> SemanticResult<EvalNode> {
    match lit_node.kind {
        AstKind::Digit => {
            let raw: i64 = lit_node
                .text
                .parse()
                .map_err(|_| SemanticError::invalid_eval(format!("not an integer literal: {}", lit_node.text), lit_node))?;
            let (datum, ty) = match field_type {
                DataType::Short => (Datum::Short(raw as i16), DataType::Short),
                DataType::Long => (Datum::Long(raw), DataType::Long),
                _ => (Datum::Int(raw as i32), DataType::Int),
            };
            Ok(EvalNode::Const(datum, ty))
        }
        AstKind::Real => {
            let raw: f64 = lit_node
                .text
                .parse()
                .map_err(|_| SemanticError::invalid_eval(format!("not a real literal: {}", lit_node.text), lit_node))?;
            let (datum, ty) = match field_type {
                DataType::Float => (Datum::Float(raw as f32), DataType::Float),
                _ => (Datum::Double(raw), DataType::Double),
            };
            Ok(EvalNode::Const(datum, ty))
        }
        AstKind::String => {
            let (datum, ty) = match field_type {
                DataType::Char => {
                    let ch = lit_node.text.chars().next().unwrap_or('\0');
                    (Datum::Char(ch), DataType::Char)
                }
                _ => (Datum::Text(lit_node.text.clone()), DataType::Text),
            };
            Ok(EvalNode::Const(datum, ty))
        }
        _ => Err(SemanticError::invalid_eval("expected a literal operand", lit_node)),
    }
}

fn canonical_signature(name: &str, arg_types: &[DataType]) -> String {
    let args = arg_types.iter().map(|t| format!("{t:?}")).collect::<Vec<_>>().join(", ");
    format!("{name}({args})")
}

fn build_function_call(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let name_node = node
        .first_child()
        .ok_or_else(|| SemanticError::invalid_query_at("function call missing name", node))?;
    if name_node.kind != AstKind::FunctionName {
        return Err(SemanticError::invalid_query_at("malformed function call", node));
    }
    let name = name_node.text.clone();
    let mut args = Vec::with_capacity(node.children.len().saturating_sub(1));
    for arg_node in &node.children[1..] {
        args.push(build_eval(arg_node, ctx)?);
    }
    let arg_types: Vec<DataType> = args.iter().map(EvalNode::value_type).collect();

    let desc = ctx
        .catalog()
        .get_function(&name, &arg_types)
        .map_err(|_| SemanticError::UndefinedFunction { canonical: canonical_signature(&name, &arg_types) })?;
    let desc = desc
        .new_instance()
        .map_err(|e| SemanticError::invalid_query(format!("function instantiation failed: {e}")))?;

    match desc.func_type {
        FunctionType::General => Ok(EvalNode::FuncCall { desc, args }),
        FunctionType::Agg => {
            ctx.set_aggregation();
            Ok(EvalNode::AggFuncCall { desc, args })
        }
    }
}

fn build_count_val(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let arg_node = node
        .first_child()
        .ok_or_else(|| SemanticError::invalid_query_at("COUNT_VAL missing argument", node))?;
    let arg = build_eval(arg_node, ctx)?;
    let desc = ctx
        .catalog()
        .get_function("count", std::slice::from_ref(&arg.value_type()))
        .map_err(|_| SemanticError::UndefinedFunction { canonical: "count(ANY)".to_string() })?;
    let desc = desc
        .new_instance()
        .map_err(|e| SemanticError::invalid_query(format!("function instantiation failed: {e}")))?;
    ctx.set_aggregation();
    Ok(EvalNode::AggFuncCall { desc, args: vec![arg] })
}

fn build_count_rows(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let desc = ctx
        .catalog()
        .get_function("count", &[])
        .map_err(|_| SemanticError::UndefinedFunction { canonical: "count()".to_string() })?;
    let desc = desc
        .new_instance()
        .map_err(|e| SemanticError::invalid_query(format!("function instantiation failed: {e}")))?;
    let _ = node;
    ctx.set_aggregation();
    Ok(EvalNode::AggFuncCall { desc, args: vec![] })
}

/// CASE (§4.15). No WHEN branches is still valid.
fn build_case(node: &AstNode, ctx: &mut Context) -> SemanticResult<EvalNode> {
    let mut branches = Vec::new();
    let mut idx = 0;
    while let Some(child) = node.children.get(idx) {
        if child.kind != AstKind::When {
            break;
        }
        let cond_node = child
            .child(0)
            .ok_or_else(|| SemanticError::invalid_eval("WHEN missing condition", child))?;
        let result_node = child
            .child(1)
            .ok_or_else(|| SemanticError::invalid_eval("WHEN missing result", child))?;
        let cond = build_eval(cond_node, ctx)?;
        let result = build_eval(result_node, ctx)?;
        branches.push((cond, result));
        idx += 1;
    }

    let else_branch = match node.children.get(idx) {
        Some(child) if child.kind == AstKind::Else => {
            let e = child
                .child(0)
                .ok_or_else(|| SemanticError::invalid_eval("ELSE missing expression", child))?;
            Some(Box::new(build_eval(e, ctx)?))
        }
        _ => None,
    };

    Ok(EvalNode::CaseWhen { branches, else_branch })
}
