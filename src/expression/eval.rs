//! Expression evaluation implementation.

use std::sync::Arc;

use log::trace;

use crate::codec;
use crate::expression::{EvalError, EvalResult, Expr, ExprKind};
use crate::row::Row;
use crate::types::Datum;

/// Evaluator binding one row to the recursive expression interpreter.
///
/// The evaluator holds no state besides the row borrow, so constructing one
/// per row is cheap. Handlers for each kind live in sibling modules as
/// further `impl Evaluator` blocks.
pub struct Evaluator<'a> {
    /// The row values to evaluate against
    row: &'a Row,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator bound to a row
    pub fn new(row: &'a Row) -> Self {
        Self { row }
    }

    /// Rebind the evaluator to another row
    pub fn bind(&mut self, row: &'a Row) {
        self.row = row;
    }

    /// Evaluate an expression and return the result.
    ///
    /// A child error aborts evaluation and is returned unchanged.
    pub fn eval(&self, expr: &Expr) -> EvalResult<Datum> {
        trace!(
            "eval {} with {} children",
            expr.kind.as_str(),
            expr.children.len()
        );

        match expr.kind {
            ExprKind::Constant => self.eval_constant(expr),
            ExprKind::ColumnRef => self.eval_column_ref(expr),

            ExprKind::Case => self.eval_case(expr),
            ExprKind::Coalesce => self.eval_coalesce(expr),
            ExprKind::If => self.eval_if(expr),
            ExprKind::IfNull => self.eval_if_null(expr),
            ExprKind::NullIf => self.eval_null_if(expr),
            ExprKind::IsNull => self.eval_is_null(expr),

            ExprKind::Lt
            | ExprKind::Le
            | ExprKind::Eq
            | ExprKind::Ne
            | ExprKind::Ge
            | ExprKind::Gt => self.eval_compare(expr),
            ExprKind::NullEq => self.eval_null_eq(expr),
            ExprKind::Like => self.eval_like(expr),
            ExprKind::In => self.eval_in(expr),

            ExprKind::Plus
            | ExprKind::Minus
            | ExprKind::Mul
            | ExprKind::Div
            | ExprKind::IntDiv
            | ExprKind::Mod => self.eval_arithmetic(expr),

            ExprKind::And | ExprKind::Or | ExprKind::Xor => self.eval_logic(expr),
            ExprKind::Not => self.eval_not(expr),

            ExprKind::BitAnd
            | ExprKind::BitOr
            | ExprKind::BitXor
            | ExprKind::LeftShift
            | ExprKind::RightShift => self.eval_bit_op(expr),
            ExprKind::BitNeg => self.eval_bit_neg(expr),

            ExprKind::Count
            | ExprKind::Sum
            | ExprKind::Avg
            | ExprKind::Min
            | ExprKind::Max
            | ExprKind::First => Err(EvalError::UnsupportedExpressionType(format!(
                "aggregate {} in scalar context",
                expr.kind.as_str()
            ))),
        }
    }

    /// Decode a constant according to its declared field type
    fn eval_constant(&self, expr: &Expr) -> EvalResult<Datum> {
        exact_children(expr, 0)?;
        let field_type = expr.field_type.as_ref().ok_or_else(|| {
            EvalError::malformed_literal(None, "constant without a declared field type")
        })?;
        codec::decode_literal(&expr.val, field_type)
    }

    /// Look up a column in the bound row. A missing column is a planner defect, not NULL.
    fn eval_column_ref(&self, expr: &Expr) -> EvalResult<Datum> {
        exact_children(expr, 0)?;
        let column_id = codec::decode_column_id(&expr.val)?;
        self.row
            .get(column_id)
            .cloned()
            .ok_or(EvalError::ColumnNotFound(column_id))
    }
}

/// Children of a node that must have exactly `count` of them
pub(crate) fn exact_children(expr: &Expr, count: usize) -> EvalResult<&[Expr]> {
    if expr.children.len() != count {
        return Err(EvalError::MalformedExpression {
            kind: expr.kind,
            expected: count.to_string(),
            actual: expr.children.len(),
        });
    }
    Ok(&expr.children)
}

/// Children of a node that needs at least `count` of them
pub(crate) fn min_children(expr: &Expr, count: usize) -> EvalResult<&[Expr]> {
    if expr.children.len() < count {
        return Err(EvalError::MalformedExpression {
            kind: expr.kind,
            expected: format!("at least {}", count),
            actual: expr.children.len(),
        });
    }
    Ok(&expr.children)
}

pub(crate) fn binary_children(expr: &Expr) -> EvalResult<(&Expr, &Expr)> {
    let children = exact_children(expr, 2)?;
    Ok((&children[0], &children[1]))
}

pub(crate) fn unary_child(expr: &Expr) -> EvalResult<&Expr> {
    let children = exact_children(expr, 1)?;
    Ok(&children[0])
}

/// Helper function to evaluate an expression against one row
pub fn evaluate_expression(expr: &Expr, row: &Row) -> EvalResult<Datum> {
    Evaluator::new(row).eval(expr)
}

/// Type alias for predicate functions
pub type Predicate = Box<dyn Fn(&Row) -> EvalResult<bool> + Send + Sync + 'static>;

/// Create a filter predicate from a shared expression tree.
///
/// NULL and numeric zero do not match. Evaluation errors are returned to the
/// caller rather than treated as a non-match.
pub fn expression_to_predicate(expr: Arc<Expr>) -> Predicate {
    Box::new(move |row| Ok(evaluate_expression(&expr, row)?.is_satisfied()))
}
