//! Manifest nodes: the declared transformation units of a pipeline.
//!
//! A [`Node`] carries everything the dry runner needs to predict its
//! schema: the compiled SQL, the target relation, the materialization and
//! schema-change policy, and its upstream dependencies. Nodes are loaded
//! from the manifest and are read-only once `deep_nodes` has been filled
//! in by [`Manifest::prepare`](crate::manifest::Manifest::prepare).

use crate::node_id::NodeId;
use crate::sql_utils::quote_parts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Resource type of a manifest node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// SQL transformation model
    #[default]
    Model,
    /// CSV seed data
    Seed,
    /// Any other resource (tests, analyses, operations); never dry run
    #[serde(other)]
    Other,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Model => write!(f, "model"),
            ResourceType::Seed => write!(f, "seed"),
            ResourceType::Other => write!(f, "other"),
        }
    }
}

/// Materialization type for models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    /// Create a view
    #[default]
    View,
    /// Create a table
    Table,
    /// Incremental table reconciled against its live schema
    Incremental,
    /// Ephemeral model (no database object)
    Ephemeral,
    /// Seed loaded from a CSV file
    Seed,
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Materialization::View => write!(f, "view"),
            Materialization::Table => write!(f, "table"),
            Materialization::Incremental => write!(f, "incremental"),
            Materialization::Ephemeral => write!(f, "ephemeral"),
            Materialization::Seed => write!(f, "seed"),
        }
    }
}

/// Schema change handling for incremental models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnSchemaChange {
    /// Trust the live schema (default)
    #[default]
    Ignore,
    /// Add columns that are new in the model
    AppendNewColumns,
    /// Let the engine add and drop columns
    SyncAllColumns,
    /// Fail on any added or removed column
    Fail,
}

impl fmt::Display for OnSchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnSchemaChange::Ignore => write!(f, "ignore"),
            OnSchemaChange::AppendNewColumns => write!(f, "append_new_columns"),
            OnSchemaChange::SyncAllColumns => write!(f, "sync_all_columns"),
            OnSchemaChange::Fail => write!(f, "fail"),
        }
    }
}

/// Declared node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NodeConfig {
    /// How the node is materialized
    #[serde(default)]
    pub materialized: Materialization,

    /// Schema change policy, only meaningful for incremental models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_schema_change: Option<OnSchemaChange>,

    /// Seed column type overrides (column name -> SQL type)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_types: BTreeMap<String, String>,
}

/// Upstream dependencies of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DependsOn {
    /// Direct upstream node ids
    #[serde(default)]
    pub nodes: Vec<NodeId>,

    /// Transitive upstream node ids; `None` until the DAG has been computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_nodes: Option<Vec<NodeId>>,
}

/// A manifest node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub unique_id: NodeId,

    /// Resource type (model, seed, ...)
    #[serde(default)]
    pub resource_type: ResourceType,

    /// Node name
    pub name: String,

    /// Target database (catalog)
    pub database: String,

    /// Target schema
    pub schema: String,

    /// Target relation name when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Compiled SQL
    #[serde(
        default,
        alias = "compiled_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub compiled_sql: Option<String>,

    /// Declared configuration
    #[serde(default)]
    pub config: NodeConfig,

    /// Upstream dependencies
    #[serde(default)]
    pub depends_on: DependsOn,

    /// Project root the file path is relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,

    /// Path of the node's source file (seed CSV for seeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file_path: Option<String>,
}

impl Node {
    /// Create a node with default config and no dependencies
    pub fn new(
        unique_id: impl Into<NodeId>,
        resource_type: ResourceType,
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            resource_type,
            name: name.into(),
            database: database.into(),
            schema: schema.into(),
            alias: None,
            compiled_sql: None,
            config: NodeConfig::default(),
            depends_on: DependsOn::default(),
            root_path: None,
            original_file_path: None,
        }
    }

    /// Set the compiled SQL
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.compiled_sql = Some(sql.into());
        self
    }

    /// Set the materialization
    pub fn with_materialized(mut self, materialized: Materialization) -> Self {
        self.config.materialized = materialized;
        self
    }

    /// Set the schema change policy
    pub fn with_on_schema_change(mut self, policy: OnSchemaChange) -> Self {
        self.config.on_schema_change = Some(policy);
        self
    }

    /// Set the direct upstream ids
    pub fn with_depends_on(mut self, nodes: Vec<NodeId>) -> Self {
        self.depends_on.nodes = nodes;
        self
    }

    /// Set the transitive upstream ids
    pub fn with_deep_nodes(mut self, deep_nodes: Vec<NodeId>) -> Self {
        self.depends_on.deep_nodes = Some(deep_nodes);
        self
    }

    /// Relation name in the target schema (`alias`, falling back to `name`)
    pub fn identifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Quoted `"database"."schema"."identifier"` reference
    pub fn qualified_name(&self) -> String {
        quote_parts(&[&self.database, &self.schema, self.identifier()])
    }

    /// Materialization shorthand
    pub fn materialized(&self) -> Materialization {
        self.config.materialized
    }

    /// Schema change policy, defaulting to [`OnSchemaChange::Ignore`]
    pub fn on_schema_change(&self) -> OnSchemaChange {
        self.config.on_schema_change.unwrap_or_default()
    }

    /// Transitive upstream ids, `None` when not yet computed
    pub fn deep_nodes(&self) -> Option<&[NodeId]> {
        self.depends_on.deep_nodes.as_deref()
    }

    /// Location of the node's file on disk, if known
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.original_file_path.as_ref()?;
        Some(match &self.root_path {
            Some(root) => PathBuf::from(root).join(file),
            None => PathBuf::from(file),
        })
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
