//! Serializable summary of a dry run

use crate::result::{DryRunResult, DryRunStatus};
use crate::store::ResultStore;
use chrono::{DateTime, Utc};
use dry_core::Table;
use serde::Serialize;

/// Outcome of a single node
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub unique_id: String,
    pub status: DryRunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&DryRunResult> for NodeReport {
    fn from(result: &DryRunResult) -> Self {
        Self {
            unique_id: result.node.unique_id.to_string(),
            status: result.status,
            table: result.table.clone(),
            error: result.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Report written at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub success: bool,
    pub node_count: usize,
    pub failure_count: usize,
    pub nodes: Vec<NodeReport>,
}

impl DryRunReport {
    /// Build the report from a run's results, in execution order
    pub fn from_results(results: &ResultStore) -> Self {
        let nodes: Vec<NodeReport> = results.iter().map(NodeReport::from).collect();
        let failure_count = results.failure_count();
        Self {
            run_id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
            generated_at: Utc::now(),
            success: failure_count == 0,
            node_count: nodes.len(),
            failure_count,
            nodes,
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
