//! Error types for dry-runner

use dry_core::CoreError;
use dry_db::DbError;
use dry_sql::SqlError;
use std::collections::BTreeSet;
use thiserror::Error;

/// Dry-run errors.
///
/// Most variants describe why a single node failed and are carried inside a
/// FAILURE [`DryRunResult`](crate::result::DryRunResult). The fatal ones
/// ([`is_fatal`](RunnerError::is_fatal)) abort the whole run.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// R001: deep_nodes were never computed for the node
    #[error("[R001] Dependency graph has not been computed for {node}")]
    MissingDependencyGraph { node: String },

    /// R002: an upstream node did not succeed
    #[error("[R002] Can't insert SELECT literals for {node} because [{}] failed", .upstreams.join(", "))]
    UpstreamFailed { node: String, upstreams: Vec<String> },

    /// R003: incremental model columns differ from the live table
    #[error("[R003] Incremental model has changed schemas. Fields added: {added:?}, Fields removed: {removed:?}")]
    SchemaChange {
        added: BTreeSet<String>,
        removed: BTreeSet<String>,
    },

    /// R004: model without compiled SQL
    #[error("[R004] Model {node} has no compiled SQL")]
    NotCompiled { node: String },

    /// R005: seed with neither a file nor declared column types
    #[error("[R005] Cannot determine schema of seed {node}: no file path and no column_types")]
    SeedSchemaUnknown { node: String },

    /// R006: a node produced two results in one run
    #[error("[R006] Result for {node} was already recorded")]
    DuplicateResult { node: String },

    /// R007: SQL rewrite failed
    #[error("[R007] {0}")]
    Sql(#[from] SqlError),

    /// R008: dry-run engine error
    #[error("[R008] {0}")]
    Engine(#[from] DbError),

    /// R009: manifest / graph error
    #[error("[R009] {0}")]
    Core(#[from] CoreError),
}

impl RunnerError {
    /// Whether the error aborts the run instead of failing one node
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RunnerError::MissingDependencyGraph { .. }
                | RunnerError::DuplicateResult { .. }
                | RunnerError::Core(_)
        )
    }
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
