//! Manifest loading and dependency preparation
//!
//! The manifest is a JSON document holding every compiled node of a
//! project, keyed by unique id (a subset of the dbt `manifest.json`
//! layout; unknown fields are ignored). Before a dry run the manifest is
//! [`prepare`](Manifest::prepare)d: the dependency DAG is built, every
//! executable node gets its transitive upstream ids in `deep_nodes`, and
//! the topological execution order is returned.

use crate::dag::NodeDag;
use crate::error::{CoreError, CoreResult};
use crate::node::{Node, ResourceType};
use crate::node_id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Free-form manifest metadata
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ManifestMetadata {
    /// Project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// When the manifest was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// Compiled project manifest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Manifest metadata
    #[serde(default)]
    pub metadata: ManifestMetadata,

    /// All nodes keyed by unique id
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, Node>,
}

impl Manifest {
    /// Load a manifest from a JSON file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a manifest from a JSON string
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Self::parse(json, "<string>")
    }

    fn parse(json: &str, origin: &str) -> CoreResult<Self> {
        let manifest: Manifest =
            serde_json::from_str(json).map_err(|e| CoreError::ManifestParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        for (key, node) in &manifest.nodes {
            if key != &node.unique_id {
                log::warn!(
                    "Manifest key '{}' does not match node unique_id '{}'",
                    key,
                    node.unique_id
                );
            }
        }

        log::debug!("Loaded manifest from {} ({} nodes)", origin, manifest.nodes.len());
        Ok(manifest)
    }

    /// Add or replace a node
    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.unique_id.clone(), node);
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Direct dependencies of every executable (model or seed) node
    pub fn dependency_map(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        self.nodes
            .values()
            .filter(|n| n.resource_type != ResourceType::Other)
            .map(|n| (n.unique_id.clone(), n.depends_on.nodes.clone()))
            .collect()
    }

    /// Build the dependency DAG of executable nodes
    pub fn build_dag(&self) -> CoreResult<NodeDag> {
        NodeDag::build(&self.dependency_map())
    }

    /// Fill in `deep_nodes` for every executable node and return the
    /// topological execution order.
    pub fn prepare(&mut self) -> CoreResult<Vec<NodeId>> {
        let dag = self.build_dag()?;

        for node in self.nodes.values_mut() {
            if !dag.contains(&node.unique_id) {
                continue;
            }
            let mut ancestors = dag.ancestors(&node.unique_id);
            ancestors.sort();
            node.depends_on.deep_nodes = Some(ancestors);
        }

        dag.topological_order()
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
