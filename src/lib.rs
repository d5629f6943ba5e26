pub mod codec;
pub mod expression;
pub mod request;
pub mod row;
pub mod types;

pub use expression::{EvalError, EvalResult, Evaluator, Expr, ExprKind};
pub use request::EvalRequest;
pub use row::Row;
pub use types::{Datum, DatumKind, FieldType};
