//! dry-sql - SQL layer for Dryflow
//!
//! This crate wraps sqlparser-rs with the DuckDB dialect and provides the
//! SQL rewrites a dry run needs: replacing upstream table references with
//! literal derived tables, and wrapping view models in DDL.

pub mod error;
pub mod literals;
pub mod parser;
mod tokens;
pub mod view;

pub use error::{SqlError, SqlResult};
pub use literals::{replace_upstream_sql, select_literal};
pub use parser::SqlParser;
pub use view::{unwrap_view, wrap_in_view, ViewDefinition};
