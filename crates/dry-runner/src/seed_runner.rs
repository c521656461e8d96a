//! Seed dry runs
//!
//! Seeds have no SQL. Their schema is inferred by describing a
//! `read_csv_auto` scan of the seed file; declared `column_types`
//! override inferred types.

use crate::error::{RunnerError, RunnerResult};
use crate::node_runner::NodeRunner;
use crate::result::DryRunResult;
use async_trait::async_trait;
use dry_core::sql_utils::escape_sql_string;
use dry_core::{Field, Node, Table};
use dry_db::SqlRunner;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs seed nodes
pub struct SeedRunner<'a> {
    sql_runner: &'a dyn SqlRunner,
}

impl<'a> SeedRunner<'a> {
    pub fn new(sql_runner: &'a dyn SqlRunner) -> Self {
        Self { sql_runner }
    }
}

#[async_trait]
impl NodeRunner for SeedRunner<'_> {
    async fn run(&self, node: &Arc<Node>) -> RunnerResult<DryRunResult> {
        let column_types = &node.config.column_types;

        let inferred = match node.file_path() {
            Some(path) => {
                let sql = format!(
                    "SELECT * FROM read_csv_auto('{}')",
                    escape_sql_string(&path.display().to_string())
                );
                match self.sql_runner.query(&sql).await {
                    Ok(table) => table.unwrap_or_default(),
                    Err(e) => return Ok(DryRunResult::failure(Arc::clone(node), e)),
                }
            }
            None if column_types.is_empty() => {
                return Ok(DryRunResult::failure(
                    Arc::clone(node),
                    RunnerError::SeedSchemaUnknown {
                        node: node.unique_id.to_string(),
                    },
                ));
            }
            None => Table::default(),
        };

        let table = apply_column_types(inferred, column_types);
        Ok(DryRunResult::success(Arc::clone(node), Some(table)))
    }
}

/// Override inferred types with declared ones; declared columns missing
/// from the inferred table are appended in name order
fn apply_column_types(inferred: Table, column_types: &BTreeMap<String, String>) -> Table {
    let mut fields: Vec<Field> = inferred
        .fields
        .into_iter()
        .map(|mut f| {
            if let Some(ty) = column_types.get(&f.name) {
                f.data_type = ty.clone();
            }
            f
        })
        .collect();

    for (name, ty) in column_types {
        if !fields.iter().any(|f| &f.name == name) {
            fields.push(Field::new(name.clone(), ty.clone()));
        }
    }
    Table::new(fields)
}

#[cfg(test)]
#[path = "seed_runner_test.rs"]
mod tests;
