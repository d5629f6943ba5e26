//! Arithmetic handlers: `+`, `-`, `*`, `/`, `DIV` and `MOD`.
//!
//! Operands are unified before computing: two integers stay integers, a
//! decimal pulls integers up to decimal, and a float pulls everything to f64.
//! Integer results are Int64 when both operands are Int64 and Uint64 as soon
//! as either operand is unsigned.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::expression::eval::binary_children;
use crate::expression::{ArithmeticError, EvalError, EvalResult, Evaluator, Expr, ExprKind};
use crate::types::Datum;

/// Operands promoted to a common numeric representation
enum Operands {
    Integer { left: i128, right: i128, unsigned: bool },
    Decimal(Decimal, Decimal),
    Float(f64, f64),
}

impl Operands {
    fn unify(op: ExprKind, left: &Datum, right: &Datum) -> EvalResult<Self> {
        let coercion_error = || EvalError::coercion(op.as_str(), left.kind(), Some(right.kind()));

        if !left.kind().is_numeric() || !right.kind().is_numeric() {
            return Err(coercion_error());
        }

        if let (Some(l), Some(r)) = (left.as_i128(), right.as_i128()) {
            let unsigned = matches!(left, Datum::Uint64(_)) || matches!(right, Datum::Uint64(_));
            return Ok(Operands::Integer {
                left: l,
                right: r,
                unsigned,
            });
        }

        if matches!(left, Datum::Float64(_)) || matches!(right, Datum::Float64(_)) {
            let l = left.as_f64().ok_or_else(coercion_error)?;
            let r = right.as_f64().ok_or_else(coercion_error)?;
            return Ok(Operands::Float(l, r));
        }

        let l = left.as_decimal().ok_or_else(coercion_error)?;
        let r = right.as_decimal().ok_or_else(coercion_error)?;
        Ok(Operands::Decimal(l, r))
    }
}

impl Evaluator<'_> {
    /// Binary arithmetic; NULL if either operand is NULL
    pub(super) fn eval_arithmetic(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        if left.is_null() || right.is_null() {
            return Ok(Datum::Null);
        }

        let op = expr.kind;
        match Operands::unify(op, &left, &right)? {
            Operands::Integer {
                left,
                right,
                unsigned,
            } => integer_arithmetic(op, left, right, unsigned),
            Operands::Decimal(left, right) => decimal_arithmetic(op, left, right),
            Operands::Float(left, right) => float_arithmetic(op, left, right),
        }
    }
}

fn integer_arithmetic(op: ExprKind, left: i128, right: i128, unsigned: bool) -> EvalResult<Datum> {
    let value = match op {
        ExprKind::Plus => left.checked_add(right),
        ExprKind::Minus => left.checked_sub(right),
        ExprKind::Mul => left.checked_mul(right),
        ExprKind::Div => {
            // SQL `/` never truncates: integer division yields a decimal
            let to_decimal = |v: i128| {
                Decimal::try_from_i128_with_scale(v, 0).map_err(|_| EvalError::overflow(op.as_str()))
            };
            return decimal_arithmetic(op, to_decimal(left)?, to_decimal(right)?);
        }
        ExprKind::IntDiv => {
            check_divisor(right == 0)?;
            left.checked_div(right)
        }
        ExprKind::Mod => {
            check_divisor(right == 0)?;
            left.checked_rem(right)
        }
        other => return Err(not_arithmetic(other)),
    };
    let value = value.ok_or_else(|| EvalError::overflow(op.as_str()))?;
    fit_integer(op, value, unsigned)
}

fn decimal_arithmetic(op: ExprKind, left: Decimal, right: Decimal) -> EvalResult<Datum> {
    let value = match op {
        ExprKind::Plus => left.checked_add(right),
        ExprKind::Minus => left.checked_sub(right),
        ExprKind::Mul => left.checked_mul(right),
        ExprKind::Div => {
            check_divisor(right.is_zero())?;
            left.checked_div(right)
        }
        ExprKind::IntDiv => {
            check_divisor(right.is_zero())?;
            let quotient = left
                .checked_div(right)
                .ok_or_else(|| EvalError::overflow(op.as_str()))?;
            let truncated = quotient
                .trunc()
                .to_i64()
                .ok_or_else(|| EvalError::overflow(op.as_str()))?;
            return Ok(Datum::Int64(truncated));
        }
        ExprKind::Mod => {
            check_divisor(right.is_zero())?;
            left.checked_rem(right)
        }
        other => return Err(not_arithmetic(other)),
    };
    value
        .map(Datum::Decimal)
        .ok_or_else(|| EvalError::overflow(op.as_str()))
}

fn float_arithmetic(op: ExprKind, left: f64, right: f64) -> EvalResult<Datum> {
    let value = match op {
        ExprKind::Plus => left + right,
        ExprKind::Minus => left - right,
        ExprKind::Mul => left * right,
        ExprKind::Div => {
            check_divisor(right == 0.0)?;
            left / right
        }
        ExprKind::IntDiv => {
            check_divisor(right == 0.0)?;
            let quotient = (left / right).trunc();
            if !quotient.is_finite() || quotient < i64::MIN as f64 || quotient >= i64::MAX as f64 {
                return Err(EvalError::overflow(op.as_str()));
            }
            return Ok(Datum::Int64(quotient as i64));
        }
        ExprKind::Mod => {
            check_divisor(right == 0.0)?;
            left % right
        }
        other => return Err(not_arithmetic(other)),
    };
    if value.is_finite() {
        Ok(Datum::Float64(value))
    } else {
        Err(EvalError::overflow(op.as_str()))
    }
}

/// Narrow an exact integer result to Int64 or Uint64
fn fit_integer(op: ExprKind, value: i128, unsigned: bool) -> EvalResult<Datum> {
    let datum = if unsigned {
        u64::try_from(value).ok().map(Datum::Uint64)
    } else {
        i64::try_from(value).ok().map(Datum::Int64)
    };
    datum.ok_or_else(|| EvalError::overflow(op.as_str()))
}

fn check_divisor(is_zero: bool) -> EvalResult<()> {
    if is_zero {
        Err(ArithmeticError::DivisionByZero.into())
    } else {
        Ok(())
    }
}

fn not_arithmetic(kind: ExprKind) -> EvalError {
    EvalError::UnsupportedExpressionType(format!("{} is not an arithmetic operator", kind.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use std::str::FromStr;

    fn arith(kind: ExprKind, left: impl Into<Datum>, right: impl Into<Datum>) -> EvalResult<Datum> {
        let row = Row::new();
        let expr = Expr::binary(kind, Expr::constant(left), Expr::constant(right));
        Evaluator::new(&row).eval(&expr)
    }

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(arith(ExprKind::Plus, 10i64, 5i64).unwrap(), Datum::Int64(15));
        assert_eq!(arith(ExprKind::Minus, 10i64, 15i64).unwrap(), Datum::Int64(-5));
        assert_eq!(arith(ExprKind::Mul, 4i64, -3i64).unwrap(), Datum::Int64(-12));
        assert_eq!(arith(ExprKind::IntDiv, -7i64, 2i64).unwrap(), Datum::Int64(-3));
        assert_eq!(arith(ExprKind::Mod, -7i64, 2i64).unwrap(), Datum::Int64(-1));
    }

    #[test]
    fn test_integer_division_yields_decimal() {
        assert_eq!(
            arith(ExprKind::Div, 10i64, 4i64).unwrap(),
            Datum::Decimal(dec("2.5"))
        );
        assert_eq!(
            arith(ExprKind::Div, 9u64, 3i64).unwrap(),
            Datum::Decimal(dec("3"))
        );
    }

    #[test]
    fn test_unsigned_arithmetic() {
        assert_eq!(
            arith(ExprKind::Plus, u64::MAX - 1, 1i64).unwrap(),
            Datum::Uint64(u64::MAX)
        );
        assert_eq!(
            arith(ExprKind::Minus, 5u64, 3i64).unwrap(),
            Datum::Uint64(2)
        );
        assert_eq!(
            arith(ExprKind::Minus, 3u64, 5i64),
            Err(EvalError::overflow("-"))
        );
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(
            arith(ExprKind::Plus, i64::MAX, 1i64),
            Err(EvalError::overflow("+"))
        );
        assert_eq!(
            arith(ExprKind::Mul, u64::MAX, u64::MAX),
            Err(EvalError::overflow("*"))
        );
        assert_eq!(
            arith(ExprKind::IntDiv, i64::MIN, -1i64),
            Err(EvalError::overflow("DIV"))
        );
    }

    #[test]
    fn test_division_by_zero() {
        for kind in [ExprKind::Div, ExprKind::IntDiv, ExprKind::Mod] {
            assert_eq!(
                arith(kind, 1i64, 0i64),
                Err(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
            );
            assert_eq!(
                arith(kind, 1.5f64, 0.0f64),
                Err(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
            );
            assert_eq!(
                arith(kind, dec("1.5"), Decimal::ZERO),
                Err(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
            );
        }
    }

    #[test]
    fn test_decimal_arithmetic() {
        assert_eq!(
            arith(ExprKind::Plus, dec("1.25"), 2i64).unwrap(),
            Datum::Decimal(dec("3.25"))
        );
        assert_eq!(
            arith(ExprKind::Mul, dec("0.5"), u64::MAX).unwrap(),
            Datum::Decimal(dec("9223372036854775807.5"))
        );
        assert_eq!(
            arith(ExprKind::IntDiv, dec("7.5"), dec("2")).unwrap(),
            Datum::Int64(3)
        );
        assert_eq!(
            arith(ExprKind::Mod, dec("7.5"), 2i64).unwrap(),
            Datum::Decimal(dec("1.5"))
        );
        assert_eq!(
            arith(ExprKind::Mul, Decimal::MAX, 2i64),
            Err(EvalError::overflow("*"))
        );
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(
            arith(ExprKind::Plus, 1.5f64, 1i64).unwrap(),
            Datum::Float64(2.5)
        );
        assert_eq!(
            arith(ExprKind::Div, dec("1"), 4.0f64).unwrap(),
            Datum::Float64(0.25)
        );
        assert_eq!(
            arith(ExprKind::IntDiv, -7.5f64, 2i64).unwrap(),
            Datum::Int64(-3)
        );
        assert_eq!(
            arith(ExprKind::Mul, f64::MAX, 2.0f64),
            Err(EvalError::overflow("*"))
        );
    }

    #[test]
    fn test_null_propagation() {
        assert_eq!(arith(ExprKind::Plus, Datum::Null, 1i64).unwrap(), Datum::Null);
        assert_eq!(arith(ExprKind::Div, 1i64, Datum::Null).unwrap(), Datum::Null);
        // NULL is checked before the divisor
        assert_eq!(arith(ExprKind::Mod, Datum::Null, 0i64).unwrap(), Datum::Null);
    }

    #[test]
    fn test_type_mismatch() {
        assert_eq!(
            arith(ExprKind::Plus, 10i64, "5"),
            Err(EvalError::TypeCoercion {
                operator: "+".to_string(),
                left: crate::types::DatumKind::Int64,
                right: Some(crate::types::DatumKind::String),
            })
        );
        assert!(matches!(
            arith(ExprKind::Minus, chrono::Duration::seconds(1), 1i64),
            Err(EvalError::TypeCoercion { .. })
        ));
    }
}
