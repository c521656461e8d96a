//! Dry-run engine trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use dry_core::{Node, Table};

/// A SQL engine that can validate queries and report their result schema
/// without materializing anything.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait SqlRunner: Send + Sync {
    /// Validate `sql` and return the schema it would produce.
    ///
    /// `Ok(None)` means the statement is valid but yields no result set.
    /// SQL that fails to validate is an `Err`. Never mutates data.
    async fn query(&self, sql: &str) -> DbResult<Option<Table>>;

    /// Live schema of the node's target relation, `None` when it does not
    /// exist yet
    async fn get_node_schema(&self, node: &Node) -> DbResult<Option<Table>>;

    /// Engine identifier for logging
    fn engine_name(&self) -> &'static str;
}
