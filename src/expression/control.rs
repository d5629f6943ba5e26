//! Control-flow handlers: CASE, COALESCE, IF, IFNULL, NULLIF and IS NULL.
//!
//! These handlers evaluate children lazily. A branch that is not selected is
//! never evaluated, so an error inside it cannot surface.

use std::cmp::Ordering;

use log::trace;

use crate::expression::eval::{binary_children, exact_children, min_children, unary_child};
use crate::expression::{EvalResult, Evaluator, Expr};
use crate::types::Datum;

impl Evaluator<'_> {
    /// Searched CASE over (condition, result) pairs with an optional trailing else.
    ///
    /// The first satisfied condition selects its result. NULL conditions are
    /// treated like FALSE. Without a match and without an else the result is NULL.
    pub(super) fn eval_case(&self, expr: &Expr) -> EvalResult<Datum> {
        let children = min_children(expr, 1)?;
        let mut pairs = children.chunks_exact(2);

        for (index, pair) in (&mut pairs).enumerate() {
            let condition = self.eval(&pair[0])?;
            if condition.is_satisfied() {
                trace!("CASE selected branch {}", index);
                return self.eval(&pair[1]);
            }
        }

        match pairs.remainder() {
            [else_result] => {
                trace!("CASE fell through to ELSE");
                self.eval(else_result)
            }
            _ => Ok(Datum::Null),
        }
    }

    /// First non-null child, left to right
    pub(super) fn eval_coalesce(&self, expr: &Expr) -> EvalResult<Datum> {
        for child in min_children(expr, 1)? {
            let value = self.eval(child)?;
            if !value.is_null() {
                return Ok(value);
            }
        }
        Ok(Datum::Null)
    }

    /// IF(cond, then, else): only the selected branch is evaluated
    pub(super) fn eval_if(&self, expr: &Expr) -> EvalResult<Datum> {
        let children = exact_children(expr, 3)?;
        if self.eval(&children[0])?.is_satisfied() {
            self.eval(&children[1])
        } else {
            self.eval(&children[2])
        }
    }

    /// IFNULL(expr, fallback): fallback is evaluated only when expr is NULL
    pub(super) fn eval_if_null(&self, expr: &Expr) -> EvalResult<Datum> {
        let (value, fallback) = binary_children(expr)?;
        let value = self.eval(value)?;
        if value.is_null() {
            self.eval(fallback)
        } else {
            Ok(value)
        }
    }

    /// NULLIF(a, b): NULL when both are non-null and equal, otherwise `a`
    pub(super) fn eval_null_if(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        if left.is_null() || right.is_null() {
            return Ok(left);
        }
        if left.compare(&right)? == Ordering::Equal {
            Ok(Datum::Null)
        } else {
            Ok(left)
        }
    }

    pub(super) fn eval_is_null(&self, expr: &Expr) -> EvalResult<Datum> {
        let operand = self.eval(unary_child(expr)?)?;
        Ok(Datum::from_bool(operand.is_null()))
    }
}
