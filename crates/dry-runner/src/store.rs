//! Write-once store of dry run results

use crate::error::{RunnerError, RunnerResult};
use crate::result::DryRunResult;
use dry_core::NodeId;
use std::collections::HashMap;

/// Results of one run keyed by node id, in insertion (execution) order.
///
/// Each node's result is written exactly once; downstream runners only
/// read from the store.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<DryRunResult>,
    index: HashMap<NodeId, usize>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. A second result for the same node is rejected.
    pub fn insert(&mut self, result: DryRunResult) -> RunnerResult<()> {
        let id = result.node.unique_id.clone();
        if self.index.contains_key(&id) {
            return Err(RunnerError::DuplicateResult {
                node: id.into_inner(),
            });
        }
        self.index.insert(id, self.results.len());
        self.results.push(result);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DryRunResult> {
        self.index.get(id).map(|&i| &self.results[i])
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in execution order
    pub fn iter(&self) -> impl Iterator<Item = &DryRunResult> {
        self.results.iter()
    }

    /// Number of FAILURE results
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
