use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::data_type::DataType;
use crate::datum::Datum;
use crate::metadata::FunctionDesc;

/// Binary operators recognized by the Expression Builder (§4.11, §4.13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
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
}

/// A typed expression node (§3). Every variant exposes [`EvalNode::value_type`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EvalNode {
    Const(Datum, DataType),
    Field(Column),
    Not(Box<EvalNode>),
    Binary(BinaryOp, Box<EvalNode>, Box<EvalNode>),
    Like { not: bool, field: Box<EvalNode>, pattern: Box<EvalNode> },
    FuncCall { desc: FunctionDesc, args: Vec<EvalNode> },
    AggFuncCall { desc: FunctionDesc, args: Vec<EvalNode> },
    CaseWhen { branches: Vec<(EvalNode, EvalNode)>, else_branch: Option<Box<EvalNode>> },
}

impl EvalNode {
    pub fn value_type(&self) -> DataType {
        match self {
            EvalNode::Const(_, ty) => *ty,
            EvalNode::Field(col) => col.value_type(),
            EvalNode::Not(_) => DataType::Bool,
            EvalNode::Binary(op, lhs, rhs) => match op {
                BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq => DataType::Bool,
                BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                    lhs.value_type().promote(rhs.value_type())
                }
            },
            EvalNode::Like { .. } => DataType::Bool,
            EvalNode::FuncCall { desc, .. } => desc.return_type,
            EvalNode::AggFuncCall { desc, .. } => desc.return_type,
            EvalNode::CaseWhen { branches, else_branch } => branches
                .first()
                .map(|(_, result)| result.value_type())
                .or_else(|| else_branch.as_ref().map(|e| e.value_type()))
                .unwrap_or(DataType::Text),
        }
    }

    /// Whether this subtree contains an aggregate call (used to derive
    /// `QueryBlock.is_aggregation`, §3).
    pub fn contains_aggregate(&self) -> bool {
        match self {
            EvalNode::Const(..) | EvalNode::Field(_) => false,
            EvalNode::Not(e) => e.contains_aggregate(),
            EvalNode::Binary(_, l, r) => l.contains_aggregate() || r.contains_aggregate(),
            EvalNode::Like { field, pattern, .. } => {
                field.contains_aggregate() || pattern.contains_aggregate()
            }
            EvalNode::FuncCall { args, .. } => args.iter().any(EvalNode::contains_aggregate),
            EvalNode::AggFuncCall { .. } => true,
            EvalNode::CaseWhen { branches, else_branch } => {
                branches.iter().any(|(c, r)| c.contains_aggregate() || r.contains_aggregate())
                    || else_branch.as_ref().is_some_and(|e| e.contains_aggregate())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FunctionType;

    #[test]
    fn comparison_binary_is_bool() {
        let node = EvalNode::Binary(
            BinaryOp::Eq,
            Box::new(EvalNode::Const(Datum::Int(1), DataType::Int)),
            Box::new(EvalNode::Const(Datum::Int(2), DataType::Int)),
        );
        assert_eq!(node.value_type(), DataType::Bool);
    }

    #[test]
    fn arithmetic_binary_promotes_operands() {
        let node = EvalNode::Binary(
            BinaryOp::Plus,
            Box::new(EvalNode::Const(Datum::Int(1), DataType::Int)),
            Box::new(EvalNode::Const(Datum::Long(2), DataType::Long)),
        );
        assert_eq!(node.value_type(), DataType::Long);
    }

    #[test]
    fn agg_func_call_marks_aggregation() {
        let desc = FunctionDesc::new("count", FunctionType::Agg, vec![DataType::Any], DataType::Long);
        let node = EvalNode::AggFuncCall { desc, args: vec![] };
        assert!(node.contains_aggregate());
    }

    #[test]
    fn plain_field_does_not_mark_aggregation() {
        let node = EvalNode::Field(Column::new("t", "a", DataType::Int));
        assert!(!node.contains_aggregate());
    }
}
