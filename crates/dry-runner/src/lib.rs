//! dry-runner - Dry-run engine for Dryflow
//!
//! Runs every executable node of a manifest in dependency order against a
//! [`SqlRunner`](dry_db::SqlRunner), predicting each node's schema from the
//! predicted schemas of its upstreams. Incremental models are reconciled
//! with their live schema according to their `on_schema_change` policy.

pub mod error;
pub mod executor;
pub mod model_runner;
pub mod node_runner;
pub mod report;
pub mod result;
pub mod schema_change;
pub mod seed_runner;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{RunnerError, RunnerResult};
pub use executor::DryRunExecutor;
pub use model_runner::ModelRunner;
pub use node_runner::NodeRunner;
pub use report::{DryRunReport, NodeReport};
pub use result::{DryRunResult, DryRunStatus};
pub use schema_change::reconcile;
pub use seed_runner::SeedRunner;
pub use store::ResultStore;
