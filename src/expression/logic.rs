//! Logical and bitwise handlers.
//!
//! Logical operators follow three-valued logic over numeric truth values:
//!
//! | a     | b     | a AND b | a OR b | a XOR b |
//! |-------|-------|---------|--------|---------|
//! | NULL  | FALSE | FALSE   | NULL   | NULL    |
//! | NULL  | TRUE  | NULL    | TRUE   | NULL    |
//! | NULL  | NULL  | NULL    | NULL   | NULL    |
//!
//! Both operands are always evaluated, so an error on either side surfaces.

use crate::expression::eval::{binary_children, unary_child};
use crate::expression::{EvalError, EvalResult, Evaluator, Expr, ExprKind};
use crate::types::Datum;

impl Evaluator<'_> {
    pub(super) fn eval_logic(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let op = expr.kind.as_str();
        let left = self.eval(left)?.to_bool(op)?;
        let right = self.eval(right)?.to_bool(op)?;

        let result = match expr.kind {
            ExprKind::And => match (left, right) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            ExprKind::Or => match (left, right) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            ExprKind::Xor => match (left, right) {
                (Some(a), Some(b)) => Some(a ^ b),
                _ => None,
            },
            other => {
                return Err(EvalError::UnsupportedExpressionType(format!(
                    "{} is not a logical operator",
                    other.as_str()
                )))
            }
        };
        Ok(result.map_or(Datum::Null, Datum::from_bool))
    }

    pub(super) fn eval_not(&self, expr: &Expr) -> EvalResult<Datum> {
        let operand = self.eval(unary_child(expr)?)?;
        Ok(match operand.to_bool(ExprKind::Not.as_str())? {
            Some(value) => Datum::from_bool(!value),
            None => Datum::Null,
        })
    }

    /// Bitwise binary operators over 64-bit two's complement; results are Uint64
    pub(super) fn eval_bit_op(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        if left.is_null() || right.is_null() {
            return Ok(Datum::Null);
        }

        let op = expr.kind;
        let coercion_error = || EvalError::coercion(op.as_str(), left.kind(), Some(right.kind()));
        let a = as_bits(&left).ok_or_else(coercion_error)?;
        let b = as_bits(&right).ok_or_else(coercion_error)?;

        let value = match op {
            ExprKind::BitAnd => a & b,
            ExprKind::BitOr => a | b,
            ExprKind::BitXor => a ^ b,
            // Shifting by 64 or more clears every bit
            ExprKind::LeftShift => a.checked_shl(shift_amount(b)).unwrap_or(0),
            ExprKind::RightShift => a.checked_shr(shift_amount(b)).unwrap_or(0),
            other => {
                return Err(EvalError::UnsupportedExpressionType(format!(
                    "{} is not a bitwise operator",
                    other.as_str()
                )))
            }
        };
        Ok(Datum::Uint64(value))
    }

    pub(super) fn eval_bit_neg(&self, expr: &Expr) -> EvalResult<Datum> {
        let operand = self.eval(unary_child(expr)?)?;
        if operand.is_null() {
            return Ok(Datum::Null);
        }
        let bits = as_bits(&operand).ok_or_else(|| {
            EvalError::coercion(ExprKind::BitNeg.as_str(), operand.kind(), None)
        })?;
        Ok(Datum::Uint64(!bits))
    }
}

/// Integer operand reinterpreted as an unsigned bit pattern
fn as_bits(datum: &Datum) -> Option<u64> {
    match datum {
        Datum::Int64(v) => Some(*v as u64),
        Datum::Uint64(v) => Some(*v),
        _ => None,
    }
}

fn shift_amount(amount: u64) -> u32 {
    u32::try_from(amount).unwrap_or(u32::MAX)
}
