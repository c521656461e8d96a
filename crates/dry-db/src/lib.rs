//! dry-db - Dry-run engine layer for Dryflow
//!
//! This crate provides the `SqlRunner` trait the dry runner talks to and
//! a DuckDB implementation that describes queries without reading data.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbRunner;
pub use error::{DbError, DbResult};
pub use traits::SqlRunner;
