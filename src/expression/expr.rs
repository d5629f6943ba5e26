//! Expression tree definitions.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::expression::{EvalResult, ExprKind};
use crate::types::{Datum, FieldType};

/// Expression tree node.
///
/// Trees are built once by the planner and never mutated afterwards, so a
/// single `Arc<Expr>` can be evaluated against many rows concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    /// Literal payload for leaf kinds, empty otherwise
    pub val: Bytes,
    pub children: Vec<Expr>,
    /// Declared type used to decode `val` for constants
    pub field_type: Option<FieldType>,
}

impl Expr {
    /// Create an interior node
    pub fn new(kind: ExprKind, children: Vec<Expr>) -> Self {
        Self {
            kind,
            val: Bytes::new(),
            children,
            field_type: None,
        }
    }

    /// Build a node from a raw wire tag
    pub fn from_raw(
        tag: i32,
        val: Bytes,
        children: Vec<Expr>,
        field_type: Option<FieldType>,
    ) -> EvalResult<Self> {
        Ok(Self {
            kind: ExprKind::try_from(tag)?,
            val,
            children,
            field_type,
        })
    }

    /// Create a constant whose payload encodes the datum
    pub fn constant(datum: impl Into<Datum>) -> Self {
        let datum = datum.into();
        Self {
            kind: ExprKind::Constant,
            val: codec::encode_datum(&datum),
            children: Vec::new(),
            field_type: Some(FieldType::of(&datum)),
        }
    }

    /// Create a NULL constant
    pub fn null() -> Self {
        Self::constant(Datum::Null)
    }

    /// Create a column reference expression
    pub fn column(column_id: i64) -> Self {
        Self {
            kind: ExprKind::ColumnRef,
            val: codec::encode_column_id(column_id),
            children: Vec::new(),
            field_type: None,
        }
    }

    /// Create a CASE expression from (condition, result) pairs and an optional else
    pub fn case(branches: Vec<(Expr, Expr)>, else_result: Option<Expr>) -> Self {
        let mut children = Vec::with_capacity(branches.len() * 2 + 1);
        for (condition, result) in branches {
            children.push(condition);
            children.push(result);
        }
        children.extend(else_result);
        Self::new(ExprKind::Case, children)
    }

    pub fn coalesce(args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Coalesce, args)
    }

    pub fn if_expr(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::new(ExprKind::If, vec![condition, then, otherwise])
    }

    pub fn is_null(operand: Expr) -> Self {
        Self::new(ExprKind::IsNull, vec![operand])
    }

    /// Create a binary operation expression
    pub fn binary(kind: ExprKind, left: Expr, right: Expr) -> Self {
        Self::new(kind, vec![left, right])
    }

    /// Create a unary operation expression
    pub fn unary(kind: ExprKind, operand: Expr) -> Self {
        Self::new(kind, vec![operand])
    }

    /// Create an IN expression: `probe IN (list...)`
    pub fn in_list(probe: Expr, list: Vec<Expr>) -> Self {
        let mut children = Vec::with_capacity(list.len() + 1);
        children.push(probe);
        children.extend(list);
        Self::new(ExprKind::In, children)
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Or, left, right)
    }

    pub fn not(operand: Expr) -> Self {
        Self::unary(ExprKind::Not, operand)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Eq, left, right)
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Lt, left, right)
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Gt, left, right)
    }

    pub fn plus(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Plus, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Self {
        Self::binary(ExprKind::Div, left, right)
    }

    /// Number of nodes in this tree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Expr::node_count).sum::<usize>()
    }
}
