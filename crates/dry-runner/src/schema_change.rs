//! Reconciliation of incremental models with their live schema
//!
//! An incremental model's next run writes into an existing table, so the
//! schema it ends up with depends on its `on_schema_change` policy. Each
//! policy is a pure function of the predicted result and the live table.

use crate::error::RunnerError;
use crate::result::{DryRunResult, DryRunStatus};
use dry_core::{Field, OnSchemaChange, Table};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Apply `policy` to a successful dry run of an incremental model whose
/// target already exists with schema `target`
pub fn reconcile(policy: OnSchemaChange, result: DryRunResult, target: &Table) -> DryRunResult {
    match policy {
        OnSchemaChange::Ignore => ignore(result, target),
        OnSchemaChange::AppendNewColumns => append_new_columns(result, target),
        OnSchemaChange::SyncAllColumns => sync_all_columns(result, target),
        OnSchemaChange::Fail => fail(result, target),
    }
}

/// The live table keeps its columns
fn ignore(result: DryRunResult, target: &Table) -> DryRunResult {
    result.replace_table(target.clone())
}

/// Predicted columns in predicted order (live definitions win), followed
/// by live-only columns in live order
fn append_new_columns(result: DryRunResult, target: &Table) -> DryRunResult {
    let Some(fields) = result
        .table
        .as_ref()
        .map(|predicted| merge_fields(predicted, target))
    else {
        return result;
    };
    result.replace_table(Table::new(fields))
}

fn merge_fields(predicted: &Table, target: &Table) -> Vec<Field> {
    let predicted_names = predicted.field_names();
    let mut fields: Vec<Field> = predicted
        .fields
        .iter()
        .map(|f| target.field(&f.name).unwrap_or(f).clone())
        .collect();
    fields.extend(
        target
            .fields
            .iter()
            .filter(|f| !predicted_names.contains(f.name.as_str()))
            .cloned(),
    );
    fields
}

/// The engine adds and drops columns itself, so the prediction stands
fn sync_all_columns(result: DryRunResult, _target: &Table) -> DryRunResult {
    result
}

fn fail(result: DryRunResult, target: &Table) -> DryRunResult {
    let Some((added, removed)) = result
        .table
        .as_ref()
        .map(|predicted| column_changes(predicted, target))
    else {
        return result;
    };

    if added.is_empty() && removed.is_empty() {
        return result.replace_table(target.clone());
    }

    log::debug!(
        "{} changed schema: added {:?}, removed {:?}",
        result.node.unique_id,
        added,
        removed
    );
    DryRunResult {
        node: result.node,
        table: None,
        status: DryRunStatus::Failure,
        error: Some(Arc::new(RunnerError::SchemaChange { added, removed })),
    }
}

/// Column names only in `predicted` and only in `target`
fn column_changes(predicted: &Table, target: &Table) -> (BTreeSet<String>, BTreeSet<String>) {
    let predicted_names = predicted.field_names();
    let target_names = target.field_names();
    let added = predicted_names
        .difference(&target_names)
        .map(|s| s.to_string())
        .collect();
    let removed = target_names
        .difference(&predicted_names)
        .map(|s| s.to_string())
        .collect();
    (added, removed)
}

#[cfg(test)]
#[path = "schema_change_test.rs"]
mod tests;
