//! Model dry runs
//!
//! A model is dry run by rewriting its compiled SQL so that every upstream
//! reference becomes a literal of the upstream's predicted schema, then
//! asking the engine to describe the rewritten statement. View models are
//! described as the `CREATE OR REPLACE VIEW` they deploy as. Incremental
//! models that already exist are reconciled with their live schema.

use crate::error::{RunnerError, RunnerResult};
use crate::node_runner::NodeRunner;
use crate::result::{DryRunResult, DryRunStatus};
use crate::schema_change::reconcile;
use crate::store::ResultStore;
use async_trait::async_trait;
use dry_core::{Materialization, Node};
use dry_db::SqlRunner;
use dry_sql::{replace_upstream_sql, wrap_in_view};
use std::sync::Arc;

/// Runs model nodes against the results of their upstreams
pub struct ModelRunner<'a> {
    sql_runner: &'a dyn SqlRunner,
    results: &'a ResultStore,
}

impl<'a> ModelRunner<'a> {
    pub fn new(sql_runner: &'a dyn SqlRunner, results: &'a ResultStore) -> Self {
        Self {
            sql_runner,
            results,
        }
    }

    /// Build the SQL to dry run: the compiled SQL with every succeeded
    /// upstream substituted by its literal.
    ///
    /// Upstreams not yet in the store are skipped.
    fn prepare_sql(&self, node: &Node) -> RunnerResult<String> {
        let deep_nodes = node
            .deep_nodes()
            .ok_or_else(|| RunnerError::MissingDependencyGraph {
                node: node.unique_id.to_string(),
            })?;

        let upstreams: Vec<&DryRunResult> = deep_nodes
            .iter()
            .filter_map(|id| self.results.get(id))
            .collect();

        let failed: Vec<String> = upstreams
            .iter()
            .filter(|r| r.status != DryRunStatus::Success)
            .map(|r| r.node.unique_id.to_string())
            .collect();
        if !failed.is_empty() {
            return Err(RunnerError::UpstreamFailed {
                node: node.unique_id.to_string(),
                upstreams: failed,
            });
        }

        let mut sql = node
            .compiled_sql
            .clone()
            .ok_or_else(|| RunnerError::NotCompiled {
                node: node.unique_id.to_string(),
            })?;

        for upstream in upstreams {
            if let Some(table) = &upstream.table {
                sql = replace_upstream_sql(&sql, &upstream.node, table)?;
            }
        }
        Ok(sql)
    }

    async fn reconcile_with_live(&self, node: &Arc<Node>, result: DryRunResult) -> DryRunResult {
        match self.sql_runner.get_node_schema(node).await {
            Ok(Some(target)) => {
                log::debug!(
                    "Reconciling {} with live schema ({})",
                    node.unique_id,
                    node.on_schema_change()
                );
                reconcile(node.on_schema_change(), result, &target)
            }
            Ok(None) => result,
            Err(e) => DryRunResult::failure(Arc::clone(node), e),
        }
    }
}

#[async_trait]
impl NodeRunner for ModelRunner<'_> {
    async fn run(&self, node: &Arc<Node>) -> RunnerResult<DryRunResult> {
        let sql = match self.prepare_sql(node) {
            Ok(sql) => sql,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => return Ok(DryRunResult::failure(Arc::clone(node), e)),
        };

        let sql = match node.materialized() {
            Materialization::View => wrap_in_view(&node.qualified_name(), &sql),
            _ => sql,
        };
        log::debug!("Dry running {}:\n{}", node.unique_id, sql);

        let result = match self.sql_runner.query(&sql).await {
            Ok(table) => DryRunResult::success(Arc::clone(node), table),
            Err(e) => return Ok(DryRunResult::failure(Arc::clone(node), e)),
        };

        if node.materialized() == Materialization::Incremental {
            return Ok(self.reconcile_with_live(node, result).await);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "model_runner_test.rs"]
mod tests;
