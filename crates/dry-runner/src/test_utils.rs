//! Shared test utilities for dry-runner

use async_trait::async_trait;
use dry_core::{Field, Materialization, Node, NodeId, OnSchemaChange, ResourceType, Table};
use dry_db::{DbError, DbResult, SqlRunner};
use std::collections::HashMap;
use std::sync::Mutex;

/// Build a table from `(name, type)` pairs
pub fn table(fields: &[(&str, &str)]) -> Table {
    fields
        .iter()
        .map(|(name, data_type)| Field::new(*name, *data_type))
        .collect()
}

/// A table-materialized model in `memory.main` named after the last
/// segment of its id, with deep_nodes already computed (empty)
pub fn model(id: &str, sql: &str) -> Node {
    let name = id.rsplit('.').next().unwrap_or(id);
    Node::new(id, ResourceType::Model, "memory", "main", name)
        .with_sql(sql)
        .with_materialized(Materialization::Table)
        .with_deep_nodes(Vec::new())
}

/// A model depending on `upstreams` (direct and deep)
pub fn model_on(id: &str, sql: &str, upstreams: &[&str]) -> Node {
    let ids: Vec<NodeId> = upstreams.iter().map(|u| NodeId::new(*u)).collect();
    model(id, sql)
        .with_depends_on(ids.clone())
        .with_deep_nodes(ids)
}

/// An incremental model with the given policy
pub fn incremental(id: &str, sql: &str, policy: OnSchemaChange) -> Node {
    model(id, sql)
        .with_materialized(Materialization::Incremental)
        .with_on_schema_change(policy)
}

/// A seed in `memory.main` with no file
pub fn seed(id: &str) -> Node {
    let name = id.rsplit('.').next().unwrap_or(id);
    Node::new(id, ResourceType::Seed, "memory", "main", name)
        .with_materialized(Materialization::Seed)
}

enum MockResponse {
    Table(Option<Table>),
    Error(String),
}

/// In-memory [`SqlRunner`] that records every query it receives.
///
/// Query responses are matched by substring in registration order; the
/// first match wins. Unmatched queries return the default table.
#[derive(Default)]
pub struct MockSqlRunner {
    responses: Vec<(String, MockResponse)>,
    default_table: Option<Table>,
    node_schemas: HashMap<String, Table>,
    schema_errors: Vec<String>,
    queries: Mutex<Vec<String>>,
    schema_lookups: Mutex<Vec<String>>,
}

impl MockSqlRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table returned for queries no pattern matches
    pub fn with_default_table(mut self, table: Table) -> Self {
        self.default_table = Some(table);
        self
    }

    /// Return `table` for queries containing `pattern`
    pub fn with_query_table(mut self, pattern: &str, table: Table) -> Self {
        self.responses
            .push((pattern.to_string(), MockResponse::Table(Some(table))));
        self
    }

    /// Fail queries containing `pattern`
    pub fn with_query_error(mut self, pattern: &str, message: &str) -> Self {
        self.responses
            .push((pattern.to_string(), MockResponse::Error(message.to_string())));
        self
    }

    /// Live schema for a node id
    pub fn with_node_schema(mut self, id: &str, table: Table) -> Self {
        self.node_schemas.insert(id.to_string(), table);
        self
    }

    /// Fail live schema lookups for a node id
    pub fn with_schema_error(mut self, id: &str) -> Self {
        self.schema_errors.push(id.to_string());
        self
    }

    /// Every SQL string passed to `query`, in order
    pub fn executed_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Every node id passed to `get_node_schema`, in order
    pub fn schema_lookups(&self) -> Vec<String> {
        self.schema_lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlRunner for MockSqlRunner {
    async fn query(&self, sql: &str) -> DbResult<Option<Table>> {
        self.queries.lock().unwrap().push(sql.to_string());
        for (pattern, response) in &self.responses {
            if sql.contains(pattern.as_str()) {
                return match response {
                    MockResponse::Table(table) => Ok(table.clone()),
                    MockResponse::Error(message) => Err(DbError::ExecutionError(message.clone())),
                };
            }
        }
        Ok(self.default_table.clone())
    }

    async fn get_node_schema(&self, node: &Node) -> DbResult<Option<Table>> {
        let id = node.unique_id.to_string();
        self.schema_lookups.lock().unwrap().push(id.clone());
        if self.schema_errors.contains(&id) {
            return Err(DbError::ExecutionError(format!("lookup failed for {}", id)));
        }
        Ok(self.node_schemas.get(&id).cloned())
    }

    fn engine_name(&self) -> &'static str {
        "mock"
    }
}
