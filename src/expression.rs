//! Expression evaluation for pushed-down filters and projections.
//!
//! This module provides:
//! - The immutable expression tree received from the planner
//! - The closed enumeration of expression kinds
//! - The per-row evaluator and its handlers
//! - The error taxonomy shared by every handler

mod arithmetic;
mod compare;
mod control;
pub mod error;
pub mod eval;
pub mod expr;
pub mod kind;
mod logic;

pub use error::{ArithmeticError, EvalError, EvalResult};
pub use eval::{evaluate_expression, expression_to_predicate, Evaluator, Predicate};
pub use expr::Expr;
pub use kind::ExprKind;
