//! Expression kind enumeration.

use serde::{Deserialize, Serialize};

use crate::expression::EvalError;

/// Kind tag of an expression node.
///
/// The numeric discriminants are the wire tags used by the planner. Serde
/// frames the tag itself, so an unknown tag in a request is rejected through
/// `TryFrom<i32>`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ExprKind {
    // Leaves
    Constant = 0,
    ColumnRef = 1,

    // Control functions
    Case = 100,
    Coalesce = 101,
    If = 102,
    IfNull = 103,
    NullIf = 104,
    IsNull = 105,

    // Comparison
    Lt = 200,
    Le = 201,
    Eq = 202,
    Ne = 203,
    Ge = 204,
    Gt = 205,
    NullEq = 206,
    Like = 207,
    In = 208,

    // Arithmetic
    Plus = 300,
    Minus = 301,
    Mul = 302,
    Div = 303,
    IntDiv = 304,
    Mod = 305,

    // Logical
    And = 400,
    Or = 401,
    Xor = 402,
    Not = 403,

    // Bitwise
    BitAnd = 500,
    BitOr = 501,
    BitXor = 502,
    BitNeg = 503,
    LeftShift = 504,
    RightShift = 505,

    // Aggregates are driven by the aggregation layer, not evaluated per row
    Count = 900,
    Sum = 901,
    Avg = 902,
    Min = 903,
    Max = 904,
    First = 905,
}

impl ExprKind {
    /// Get the display string for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            ExprKind::Constant => "constant",
            ExprKind::ColumnRef => "column",
            ExprKind::Case => "CASE",
            ExprKind::Coalesce => "COALESCE",
            ExprKind::If => "IF",
            ExprKind::IfNull => "IFNULL",
            ExprKind::NullIf => "NULLIF",
            ExprKind::IsNull => "IS NULL",
            ExprKind::Lt => "<",
            ExprKind::Le => "<=",
            ExprKind::Eq => "=",
            ExprKind::Ne => "!=",
            ExprKind::Ge => ">=",
            ExprKind::Gt => ">",
            ExprKind::NullEq => "<=>",
            ExprKind::Like => "LIKE",
            ExprKind::In => "IN",
            ExprKind::Plus => "+",
            ExprKind::Minus => "-",
            ExprKind::Mul => "*",
            ExprKind::Div => "/",
            ExprKind::IntDiv => "DIV",
            ExprKind::Mod => "MOD",
            ExprKind::And => "AND",
            ExprKind::Or => "OR",
            ExprKind::Xor => "XOR",
            ExprKind::Not => "NOT",
            ExprKind::BitAnd => "&",
            ExprKind::BitOr => "|",
            ExprKind::BitXor => "^",
            ExprKind::BitNeg => "~",
            ExprKind::LeftShift => "<<",
            ExprKind::RightShift => ">>",
            ExprKind::Count => "COUNT",
            ExprKind::Sum => "SUM",
            ExprKind::Avg => "AVG",
            ExprKind::Min => "MIN",
            ExprKind::Max => "MAX",
            ExprKind::First => "FIRST",
        }
    }
}

impl From<ExprKind> for i32 {
    fn from(kind: ExprKind) -> Self {
        kind as i32
    }
}

impl TryFrom<i32> for ExprKind {
    type Error = EvalError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        let kind = match tag {
            0 => ExprKind::Constant,
            1 => ExprKind::ColumnRef,
            100 => ExprKind::Case,
            101 => ExprKind::Coalesce,
            102 => ExprKind::If,
            103 => ExprKind::IfNull,
            104 => ExprKind::NullIf,
            105 => ExprKind::IsNull,
            200 => ExprKind::Lt,
            201 => ExprKind::Le,
            202 => ExprKind::Eq,
            203 => ExprKind::Ne,
            204 => ExprKind::Ge,
            205 => ExprKind::Gt,
            206 => ExprKind::NullEq,
            207 => ExprKind::Like,
            208 => ExprKind::In,
            300 => ExprKind::Plus,
            301 => ExprKind::Minus,
            302 => ExprKind::Mul,
            303 => ExprKind::Div,
            304 => ExprKind::IntDiv,
            305 => ExprKind::Mod,
            400 => ExprKind::And,
            401 => ExprKind::Or,
            402 => ExprKind::Xor,
            403 => ExprKind::Not,
            500 => ExprKind::BitAnd,
            501 => ExprKind::BitOr,
            502 => ExprKind::BitXor,
            503 => ExprKind::BitNeg,
            504 => ExprKind::LeftShift,
            505 => ExprKind::RightShift,
            900 => ExprKind::Count,
            901 => ExprKind::Sum,
            902 => ExprKind::Avg,
            903 => ExprKind::Min,
            904 => ExprKind::Max,
            905 => ExprKind::First,
            _ => {
                return Err(EvalError::UnsupportedExpressionType(format!(
                    "unknown tag {}",
                    tag
                )))
            }
        };
        Ok(kind)
    }
}
