//! Value model for pushdown evaluation.
//!
//! This module provides:
//!
//! - **Datum**: a closed, immutable typed value that may be SQL NULL
//! - **DatumKind**: the variant tag of a Datum
//! - **FieldType**: the declared type of a leaf expression, used to decode literals
//!
//! Comparison and truth-value rules live next to the Datum so every handler in
//! the evaluator applies the same coercion.

pub mod datum;
pub mod field_type;

pub use datum::{Datum, DatumKind};
pub use field_type::FieldType;
