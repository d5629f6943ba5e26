//! Error types for expression evaluation.

use crate::expression::ExprKind;
use crate::types::DatumKind;
use thiserror::Error;

/// Errors that can occur during expression evaluation.
///
/// Every variant describes a malformed tree or a row that violates the
/// planner's contract. SQL NULL is never reported through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The node kind has no scalar handler, or the raw tag is outside the enumeration
    #[error("Unsupported expression type: {0}")]
    UnsupportedExpressionType(String),

    /// A literal payload could not be decoded according to its declared type
    #[error("Malformed literal for {field_type:?}: {reason}")]
    MalformedLiteral {
        field_type: Option<DatumKind>,
        reason: String,
    },

    /// The referenced column id is absent from the bound row
    #[error("Column {0} not found in row")]
    ColumnNotFound(i64),

    /// Operands cannot be unified to a common type
    #[error("Type coercion failed for {operator}: left={left:?}, right={right:?}")]
    TypeCoercion {
        operator: String,
        left: DatumKind,
        right: Option<DatumKind>,
    },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// A node carries the wrong number of children for its kind
    #[error("Malformed {kind:?} expression: expected {expected} children, got {actual}")]
    MalformedExpression {
        kind: ExprKind,
        expected: String,
        actual: usize,
    },
}

/// Numeric failures raised by arithmetic handlers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Arithmetic overflow in {operator}")]
    Overflow { operator: &'static str },

    #[error("Division by zero")]
    DivisionByZero,
}

impl EvalError {
    pub(crate) fn malformed_literal(field_type: Option<DatumKind>, reason: impl Into<String>) -> Self {
        EvalError::MalformedLiteral {
            field_type,
            reason: reason.into(),
        }
    }

    pub(crate) fn coercion(operator: &str, left: DatumKind, right: Option<DatumKind>) -> Self {
        EvalError::TypeCoercion {
            operator: operator.to_string(),
            left,
            right,
        }
    }

    pub(crate) fn overflow(operator: &'static str) -> Self {
        EvalError::Arithmetic(ArithmeticError::Overflow { operator })
    }
}

/// Result type for expression evaluation
pub type EvalResult<T> = Result<T, EvalError>;
