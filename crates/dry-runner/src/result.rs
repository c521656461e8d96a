//! Per-node dry run outcome

use crate::error::RunnerError;
use dry_core::{Node, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome status of a node's dry run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DryRunStatus {
    Success,
    Failure,
}

impl fmt::Display for DryRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DryRunStatus::Success => write!(f, "SUCCESS"),
            DryRunStatus::Failure => write!(f, "FAILURE"),
        }
    }
}

/// The predicted schema (or failure) of one node
#[derive(Debug, Clone)]
pub struct DryRunResult {
    pub node: Arc<Node>,
    pub table: Option<Table>,
    pub status: DryRunStatus,
    pub error: Option<Arc<RunnerError>>,
}

impl DryRunResult {
    /// Successful dry run; `table` is absent when the engine reported no
    /// result set
    pub fn success(node: Arc<Node>, table: Option<Table>) -> Self {
        Self {
            node,
            table,
            status: DryRunStatus::Success,
            error: None,
        }
    }

    /// Failed dry run
    pub fn failure(node: Arc<Node>, error: impl Into<RunnerError>) -> Self {
        Self {
            node,
            table: None,
            status: DryRunStatus::Failure,
            error: Some(Arc::new(error.into())),
        }
    }

    /// Same result with a different table
    pub fn replace_table(self, table: Table) -> Self {
        Self {
            table: Some(table),
            ..self
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DryRunStatus::Success
    }
}
