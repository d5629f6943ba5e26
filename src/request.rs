//! Evaluation requests shipped from the planner to a compute node.
//!
//! A request bundles one expression tree with one decoded row and is framed
//! with bincode.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::expression::{evaluate_expression, EvalResult, Expr};
use crate::row::Row;
use crate::types::Datum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRequest {
    pub expr: Expr,
    pub row: Row,
}

impl EvalRequest {
    pub fn new(expr: Expr, row: Row) -> Self {
        Self { expr, row }
    }

    /// Serialize the request to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize a request from bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }

    /// Load a bincode-framed request from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?;
        let request = Self::deserialize(&data)
            .with_context(|| format!("Failed to decode request file {}", path.display()))?;
        debug!(
            "Loaded request from {}: {} expression nodes, {} columns",
            path.display(),
            request.expr.node_count(),
            request.row.len()
        );
        Ok(request)
    }

    /// Write the request to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.serialize().context("Failed to encode request")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write request file {}", path.display()))?;
        Ok(())
    }

    /// Evaluate the expression against the bundled row
    pub fn evaluate(&self) -> EvalResult<Datum> {
        evaluate_expression(&self.expr, &self.row)
    }
}
