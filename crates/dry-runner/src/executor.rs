//! DAG execution of a dry run

use crate::error::RunnerResult;
use crate::model_runner::ModelRunner;
use crate::node_runner::NodeRunner;
use crate::result::DryRunResult;
use crate::seed_runner::SeedRunner;
use crate::store::ResultStore;
use dry_core::{CoreError, Manifest, NodeId, ResourceType};
use dry_db::SqlRunner;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Runs every executable node of a manifest in topological order.
///
/// Nodes are awaited one at a time, so each node sees the final results
/// of all its upstreams. A node failure is recorded and the walk goes on;
/// fatal errors abort the run.
pub struct DryRunExecutor {
    sql_runner: Arc<dyn SqlRunner>,
    selection: Option<Vec<NodeId>>,
}

impl DryRunExecutor {
    pub fn new(sql_runner: Arc<dyn SqlRunner>) -> Self {
        Self {
            sql_runner,
            selection: None,
        }
    }

    /// Only run the given nodes and their upstreams
    pub fn with_selection(mut self, ids: Vec<NodeId>) -> Self {
        self.selection = Some(ids);
        self
    }

    /// Prepare the manifest and dry run its nodes
    pub async fn execute(&self, manifest: &mut Manifest) -> RunnerResult<ResultStore> {
        let order = manifest.prepare()?;
        let order = self.apply_selection(manifest, order)?;

        log::info!(
            "Dry running {} node(s) with {}",
            order.len(),
            self.sql_runner.engine_name()
        );

        let mut results = ResultStore::new();
        for id in order {
            let node = manifest
                .nodes
                .get(&id)
                .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })?;
            let node = Arc::new(node.clone());

            let result = match node.resource_type {
                ResourceType::Seed => SeedRunner::new(self.sql_runner.as_ref()).run(&node).await?,
                ResourceType::Model => {
                    ModelRunner::new(self.sql_runner.as_ref(), &results)
                        .run(&node)
                        .await?
                }
                ResourceType::Other => continue,
            };

            log_outcome(&result);
            results.insert(result)?;
        }

        log::info!(
            "Dry run finished: {} node(s), {} failure(s)",
            results.len(),
            results.failure_count()
        );
        Ok(results)
    }

    fn apply_selection(&self, manifest: &Manifest, order: Vec<NodeId>) -> RunnerResult<Vec<NodeId>> {
        let Some(selection) = &self.selection else {
            return Ok(order);
        };

        let mut keep: BTreeSet<&NodeId> = BTreeSet::new();
        for id in selection {
            let node = manifest
                .get(id)
                .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })?;
            keep.insert(&node.unique_id);
            keep.extend(node.deep_nodes().unwrap_or_default());
        }

        Ok(order.into_iter().filter(|id| keep.contains(id)).collect())
    }
}

fn log_outcome(result: &DryRunResult) {
    let id = &result.node.unique_id;
    match &result.error {
        None => log::info!(
            "{} {} ({} columns)",
            result.status,
            id,
            result.table.as_ref().map_or(0, |t| t.len())
        ),
        Some(e) => log::warn!("{} {}: {}", result.status, id, e),
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
