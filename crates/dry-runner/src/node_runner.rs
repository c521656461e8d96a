//! Node runner trait

use crate::error::RunnerResult;
use crate::result::DryRunResult;
use async_trait::async_trait;
use dry_core::Node;
use std::sync::Arc;

/// Predicts the schema of one node.
///
/// Per-node problems (bad SQL, failed upstreams, engine rejections) are
/// returned as a FAILURE [`DryRunResult`]; `Err` is reserved for errors
/// that must abort the run.
#[async_trait]
pub trait NodeRunner: Send + Sync {
    async fn run(&self, node: &Arc<Node>) -> RunnerResult<DryRunResult>;
}
