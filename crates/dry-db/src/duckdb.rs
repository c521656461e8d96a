//! DuckDB dry-run engine

use crate::error::{DbError, DbResult};
use crate::traits::SqlRunner;
use async_trait::async_trait;
use dry_core::{Field, FieldMode, Node, Table};
use dry_sql::{unwrap_view, SqlParser};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB-backed [`SqlRunner`]
///
/// Queries are bound with `DESCRIBE`, which resolves every column type
/// without scanning any data.
pub struct DuckDbRunner {
    conn: Mutex<Connection>,
}

impl DuckDbRunner {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Execute setup statements, e.g. creating the live tables of
    /// incremental models before a run
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Bind `query` with DESCRIBE and collect its columns
    fn describe_sync(&self, query: &str) -> DbResult<Table> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("DESCRIBE {}", query))?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let data_type: String = row.get(1)?;
            let null: Option<String> = row.get(2)?;
            Ok((name, data_type, null))
        })?;

        let mut fields = Vec::new();
        for row in rows {
            let (name, data_type, null) = row?;
            fields.push(Field::new(name, data_type).with_mode(mode_from_nullable(null.as_deref())));
        }
        Ok(Table::new(fields))
    }

    /// Prepare each statement so DuckDB binds it against the catalog.
    /// Preparing plans a statement but never executes it.
    fn bind_sync(&self, statements: &[String]) -> DbResult<()> {
        let conn = self.lock()?;
        for statement in statements {
            conn.prepare(statement)?;
        }
        Ok(())
    }

    fn node_schema_sync(&self, node: &Node) -> DbResult<Option<Table>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT column_name, data_type, is_nullable \
             FROM information_schema.columns \
             WHERE table_catalog = ? AND table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map(
            duckdb::params![node.database, node.schema, node.identifier()],
            |row| {
                let name: String = row.get(0)?;
                let data_type: String = row.get(1)?;
                let nullable: Option<String> = row.get(2)?;
                Ok((name, data_type, nullable))
            },
        )?;

        let mut fields = Vec::new();
        for row in rows {
            let (name, data_type, nullable) = row?;
            fields.push(
                Field::new(name, data_type).with_mode(mode_from_nullable(nullable.as_deref())),
            );
        }

        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Table::new(fields)))
        }
    }
}

/// DuckDB reports nullability as YES/NO
fn mode_from_nullable(value: Option<&str>) -> FieldMode {
    match value {
        Some(v) if v.eq_ignore_ascii_case("NO") => FieldMode::Required,
        _ => FieldMode::Nullable,
    }
}

#[async_trait]
impl SqlRunner for DuckDbRunner {
    async fn query(&self, sql: &str) -> DbResult<Option<Table>> {
        if let Some(view) = unwrap_view(sql) {
            return self.describe_sync(&view.query).map(Some);
        }

        let parser = SqlParser::duckdb();
        match parser.is_single_query(sql) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("Statement yields no result set, binding without DESCRIBE");
                let statements = parser
                    .split_statements(sql)
                    .map_err(|e| DbError::ExecutionError(e.to_string()))?;
                self.bind_sync(&statements)?;
                return Ok(None);
            }
            Err(e) => log::debug!("Leaving validation to DuckDB: {}", e),
        }

        let query = sql.trim().trim_end_matches(';').trim_end();
        self.describe_sync(query).map(Some)
    }

    async fn get_node_schema(&self, node: &Node) -> DbResult<Option<Table>> {
        self.node_schema_sync(node)
    }

    fn engine_name(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
