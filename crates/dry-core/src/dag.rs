//! DAG building and topological sorting

use crate::error::{CoreError, CoreResult};
use crate::node_id::NodeId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A directed acyclic graph of node dependencies
#[derive(Debug)]
pub struct NodeDag {
    /// The underlying graph; edges point from dependency to dependent
    graph: DiGraph<NodeId, ()>,

    /// Map from node id to graph index
    node_map: HashMap<NodeId, NodeIndex>,
}

impl NodeDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node to the DAG
    pub fn add_node(&mut self, id: &str) -> CoreResult<NodeIndex> {
        if let Some(&idx) = self.node_map.get(id) {
            Ok(idx)
        } else {
            let node_id = NodeId::try_new(id).ok_or_else(|| CoreError::EmptyName {
                context: "node id in DAG".into(),
            })?;
            let idx = self.graph.add_node(node_id.clone());
            self.node_map.insert(node_id, idx);
            Ok(idx)
        }
    }

    /// Add a dependency edge (`from` depends on `to`)
    pub fn add_dependency(&mut self, from: &str, to: &str) -> CoreResult<()> {
        let from_idx = self.add_node(from)?;
        let to_idx = self.add_node(to)?;
        // Edge goes from dependency to dependent so that a topological
        // sort yields dependencies first
        self.graph.add_edge(to_idx, from_idx, ());
        Ok(())
    }

    /// Build the DAG from a map of node id -> direct dependencies.
    ///
    /// Dependencies that are not keys of the map (sources, disabled nodes)
    /// do not produce edges.
    pub fn build(dependencies: &BTreeMap<NodeId, Vec<NodeId>>) -> CoreResult<Self> {
        let mut dag = Self::new();

        for id in dependencies.keys() {
            dag.add_node(id)?;
        }

        for (id, deps) in dependencies {
            for dep in deps {
                if dependencies.contains_key(dep) {
                    dag.add_dependency(id, dep)?;
                } else {
                    log::debug!("Ignoring dependency of {} on unknown node {}", id, dep);
                }
            }
        }

        dag.validate()?;

        Ok(dag)
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        self.topological_order().map(|_| ())
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Get node ids in topological order (dependencies first)
    pub fn topological_order(&self) -> CoreResult<Vec<NodeId>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => {
                let cycle_str = self.find_cycle_path(cycle.node_id());
                Err(CoreError::CircularDependency { cycle: cycle_str })
            }
        }
    }

    /// Get all ancestors (transitive dependencies) of a node
    pub fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        self.collect_ancestors_dfs(idx, &mut result, &mut visited);
        result
    }

    fn collect_ancestors_dfs(
        &self,
        idx: NodeIndex,
        result: &mut Vec<NodeId>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        for edge in self.graph.edges_directed(idx, Direction::Incoming) {
            let neighbor = edge.source();
            if visited.insert(neighbor) {
                result.push(self.graph[neighbor].clone());
                self.collect_ancestors_dfs(neighbor, result, visited);
            }
        }
    }

    /// Check if a node exists in the DAG
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Number of nodes in the DAG
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Whether the DAG has no nodes
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

impl Default for NodeDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
