//! Comparison handlers: ordering operators, NULL-safe equality, LIKE and IN.

use std::cmp::Ordering;

use crate::expression::eval::{binary_children, min_children};
use crate::expression::{EvalError, EvalResult, Evaluator, Expr, ExprKind};
use crate::types::Datum;

impl Evaluator<'_> {
    /// `<`, `<=`, `=`, `!=`, `>=`, `>`: NULL if either side is NULL
    pub(super) fn eval_compare(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        if left.is_null() || right.is_null() {
            return Ok(Datum::Null);
        }

        let ordering = left.compare(&right)?;
        let result = match expr.kind {
            ExprKind::Lt => ordering == Ordering::Less,
            ExprKind::Le => ordering != Ordering::Greater,
            ExprKind::Eq => ordering == Ordering::Equal,
            ExprKind::Ne => ordering != Ordering::Equal,
            ExprKind::Ge => ordering != Ordering::Less,
            ExprKind::Gt => ordering == Ordering::Greater,
            other => {
                return Err(EvalError::UnsupportedExpressionType(format!(
                    "{} is not a comparison",
                    other.as_str()
                )))
            }
        };
        Ok(Datum::from_bool(result))
    }

    /// `<=>`: NULL-safe equality, never NULL itself
    pub(super) fn eval_null_eq(&self, expr: &Expr) -> EvalResult<Datum> {
        let (left, right) = binary_children(expr)?;
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        let equal = match (left.is_null(), right.is_null()) {
            (true, true) => true,
            (true, false) | (false, true) => false,
            (false, false) => left.compare(&right)? == Ordering::Equal,
        };
        Ok(Datum::from_bool(equal))
    }

    /// `text LIKE pattern` with `%`, `_` and `\` escapes
    pub(super) fn eval_like(&self, expr: &Expr) -> EvalResult<Datum> {
        let (text, pattern) = binary_children(expr)?;
        let text = self.eval(text)?;
        let pattern = self.eval(pattern)?;

        let matched = match (&text, &pattern) {
            (Datum::Null, _) | (_, Datum::Null) => return Ok(Datum::Null),
            (Datum::String(t), Datum::String(p)) => {
                let t: Vec<char> = t.chars().collect();
                let p: Vec<char> = p.chars().collect();
                like_match(&t, &p, '_', '%', '\\')
            }
            _ if text.kind().is_binary_string() && pattern.kind().is_binary_string() => {
                like_match(as_bytes(&text), as_bytes(&pattern), b'_', b'%', b'\\')
            }
            _ => {
                return Err(EvalError::coercion(
                    ExprKind::Like.as_str(),
                    text.kind(),
                    Some(pattern.kind()),
                ))
            }
        };
        Ok(Datum::from_bool(matched))
    }

    /// `probe IN (items...)`.
    ///
    /// A NULL probe yields NULL without evaluating the list. The first equal
    /// item yields 1 and stops; otherwise the result is NULL if any item was
    /// NULL, else 0.
    pub(super) fn eval_in(&self, expr: &Expr) -> EvalResult<Datum> {
        let children = min_children(expr, 2)?;
        let probe = self.eval(&children[0])?;
        if probe.is_null() {
            return Ok(Datum::Null);
        }

        let mut saw_null = false;
        for item in &children[1..] {
            let item = self.eval(item)?;
            if item.is_null() {
                saw_null = true;
                continue;
            }
            if probe.compare(&item)? == Ordering::Equal {
                return Ok(Datum::from_bool(true));
            }
        }

        if saw_null {
            Ok(Datum::Null)
        } else {
            Ok(Datum::from_bool(false))
        }
    }
}

fn as_bytes(datum: &Datum) -> &[u8] {
    match datum {
        Datum::String(s) => s.as_bytes(),
        Datum::Bytes(b) => b,
        _ => &[],
    }
}

enum PatternToken<T> {
    Literal(T),
    AnyOne,
    AnyMany,
}

fn compile_pattern<T: Copy + PartialEq>(
    pattern: &[T],
    any_one: T,
    any_many: T,
    escape: T,
) -> Vec<PatternToken<T>> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut iter = pattern.iter().copied();
    while let Some(item) = iter.next() {
        let token = if item == escape {
            // A trailing escape matches itself
            PatternToken::Literal(iter.next().unwrap_or(escape))
        } else if item == any_one {
            PatternToken::AnyOne
        } else if item == any_many {
            PatternToken::AnyMany
        } else {
            PatternToken::Literal(item)
        };
        tokens.push(token);
    }
    tokens
}

/// Wildcard match with single-star backtracking
fn like_match<T: Copy + PartialEq>(
    text: &[T],
    pattern: &[T],
    any_one: T,
    any_many: T,
    escape: T,
) -> bool {
    let tokens = compile_pattern(pattern, any_one, any_many, escape);

    let mut t = 0;
    let mut p = 0;
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(PatternToken::AnyMany) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(PatternToken::AnyOne) => {
                p += 1;
                t += 1;
            }
            Some(PatternToken::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    backtrack = Some((star_p, star_t + 1));
                    p = star_p + 1;
                    t = star_t + 1;
                }
                None => return false,
            },
        }
    }

    tokens[p..]
        .iter()
        .all(|token| matches!(token, PatternToken::AnyMany))
}
