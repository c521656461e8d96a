//! dry-core - Core library for Dryflow
//!
//! This crate provides the shared types used across all Dryflow
//! components: manifest nodes, predicted table schemas, configuration
//! parsing, and DAG building with transitive upstream computation.

pub mod config;
pub mod dag;
pub mod error;
pub mod manifest;
pub mod node;
pub mod node_id;
pub mod sql_utils;
pub mod table;

pub use config::{Config, DatabaseConfig};
pub use dag::NodeDag;
pub use error::{CoreError, CoreResult};
pub use manifest::Manifest;
pub use node::{DependsOn, Materialization, Node, NodeConfig, OnSchemaChange, ResourceType};
pub use node_id::NodeId;
pub use table::{Field, FieldMode, Table};
