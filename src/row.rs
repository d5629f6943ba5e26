//! Materialized row handed to the evaluator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Datum;

/// Column values of one tuple, keyed by stable column id.
///
/// Rows are populated by the row decoder; the evaluator only reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: HashMap<i64, Datum>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, returning the previous one
    pub fn insert(&mut self, column_id: i64, datum: Datum) -> Option<Datum> {
        self.columns.insert(column_id, datum)
    }

    pub fn get(&self, column_id: i64) -> Option<&Datum> {
        self.columns.get(&column_id)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(i64, Datum)> for Row {
    fn from_iter<T: IntoIterator<Item = (i64, Datum)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
