//! End-to-end dry runs against an in-memory DuckDB

use dry_core::{Manifest, Materialization, Node, NodeId, OnSchemaChange, ResourceType};
use dry_db::{DuckDbRunner, SqlRunner};
use dry_runner::{DryRunExecutor, DryRunReport, DryRunStatus, RunnerError};
use std::sync::Arc;
use tempfile::TempDir;

struct Shop {
    _dir: TempDir,
    manifest: Manifest,
}

/// raw_orders (seed) -> stg_orders (view) -> fct_orders (incremental)
fn shop(fct_policy: OnSchemaChange) -> Shop {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("raw_orders.csv");
    std::fs::write(&csv, "id,amount\n1,10.5\n2,20.0\n").unwrap();

    let mut raw = Node::new(
        "seed.shop.raw_orders",
        ResourceType::Seed,
        "memory",
        "raw",
        "raw_orders",
    )
    .with_materialized(Materialization::Seed);
    raw.original_file_path = Some(csv.display().to_string());

    let stg = Node::new(
        "model.shop.stg_orders",
        ResourceType::Model,
        "memory",
        "staging",
        "stg_orders",
    )
    .with_sql(r#"SELECT id AS order_id, amount FROM "memory"."raw"."raw_orders""#)
    .with_materialized(Materialization::View)
    .with_depends_on(vec![NodeId::new("seed.shop.raw_orders")]);

    let fct = Node::new(
        "model.shop.fct_orders",
        ResourceType::Model,
        "memory",
        "marts",
        "fct_orders",
    )
    .with_sql(
        "SELECT s.order_id, s.amount, s.amount * 2 AS doubled FROM memory.staging.stg_orders AS s",
    )
    .with_materialized(Materialization::Incremental)
    .with_on_schema_change(fct_policy)
    .with_depends_on(vec![NodeId::new("model.shop.stg_orders")]);

    let mut manifest = Manifest::default();
    manifest.insert(raw);
    manifest.insert(stg);
    manifest.insert(fct);

    Shop {
        _dir: dir,
        manifest,
    }
}

fn engine_with_live_fct() -> Arc<DuckDbRunner> {
    let db = DuckDbRunner::in_memory().unwrap();
    db.execute_batch(
        "CREATE SCHEMA marts; \
         CREATE TABLE marts.fct_orders (order_id BIGINT NOT NULL, amount DOUBLE, loaded_at TIMESTAMP);",
    )
    .unwrap();
    Arc::new(db)
}

fn field_names(table: &dry_core::Table) -> Vec<&str> {
    table.fields.iter().map(|f| f.name.as_str()).collect()
}

#[tokio::test]
async fn test_append_new_columns_scenario() {
    let mut shop = shop(OnSchemaChange::AppendNewColumns);
    let engine = engine_with_live_fct();

    let store = DryRunExecutor::new(engine.clone())
        .execute(&mut shop.manifest)
        .await
        .unwrap();

    assert_eq!(store.failure_count(), 0);

    let raw = store.get("seed.shop.raw_orders").unwrap();
    assert_eq!(field_names(raw.table.as_ref().unwrap()), vec!["id", "amount"]);

    let stg = store.get("model.shop.stg_orders").unwrap();
    let stg_table = stg.table.as_ref().unwrap();
    assert_eq!(field_names(stg_table), vec!["order_id", "amount"]);
    assert_eq!(
        stg_table.field("order_id").unwrap().data_type,
        raw.table.as_ref().unwrap().field("id").unwrap().data_type
    );

    let fct = store.get("model.shop.fct_orders").unwrap();
    let fct_table = fct.table.as_ref().unwrap();
    assert_eq!(
        field_names(fct_table),
        vec!["order_id", "amount", "doubled", "loaded_at"]
    );
    assert_eq!(
        fct_table.field("order_id").unwrap().mode,
        dry_core::FieldMode::Required
    );
    assert_eq!(fct_table.field("loaded_at").unwrap().data_type, "TIMESTAMP");

    // The view was only described, never created
    let stg_node = shop.manifest.get("model.shop.stg_orders").unwrap();
    assert!(engine.get_node_schema(stg_node).await.unwrap().is_none());
}

#[tokio::test]
async fn test_fail_policy_scenario() {
    let mut shop = shop(OnSchemaChange::Fail);
    let engine = engine_with_live_fct();

    let store = DryRunExecutor::new(engine)
        .execute(&mut shop.manifest)
        .await
        .unwrap();

    let fct = store.get("model.shop.fct_orders").unwrap();
    assert_eq!(fct.status, DryRunStatus::Failure);
    assert!(fct.table.is_none());
    match fct.error.as_deref() {
        Some(RunnerError::SchemaChange { added, removed }) => {
            assert!(added.contains("doubled"));
            assert!(removed.contains("loaded_at"));
        }
        other => panic!("expected SchemaChange, got {:?}", other),
    }

    let report = DryRunReport::from_results(&store);
    assert!(!report.success);
    assert_eq!(report.failure_count, 1);
}

#[tokio::test]
async fn test_new_incremental_model_uses_prediction() {
    let mut shop = shop(OnSchemaChange::Fail);
    let engine = Arc::new(DuckDbRunner::in_memory().unwrap());

    let store = DryRunExecutor::new(engine)
        .execute(&mut shop.manifest)
        .await
        .unwrap();

    let fct = store.get("model.shop.fct_orders").unwrap();
    assert!(fct.is_success());
    assert_eq!(
        field_names(fct.table.as_ref().unwrap()),
        vec!["order_id", "amount", "doubled"]
    );
}

#[tokio::test]
async fn test_bad_column_fails_model_and_downstream() {
    let mut shop = shop(OnSchemaChange::Ignore);
    if let Some(stg) = shop.manifest.nodes.get_mut("model.shop.stg_orders") {
        stg.compiled_sql = Some(
            r#"SELECT missing_column FROM "memory"."raw"."raw_orders""#.to_string(),
        );
    }
    let engine = Arc::new(DuckDbRunner::in_memory().unwrap());

    let store = DryRunExecutor::new(engine)
        .execute(&mut shop.manifest)
        .await
        .unwrap();

    let stg = store.get("model.shop.stg_orders").unwrap();
    assert!(matches!(stg.error.as_deref(), Some(RunnerError::Engine(_))));

    let fct = store.get("model.shop.fct_orders").unwrap();
    assert!(matches!(
        fct.error.as_deref(),
        Some(RunnerError::UpstreamFailed { .. })
    ));
}

#[tokio::test]
async fn test_duckdb_only_syntax_scenario() {
    let mut shop = shop(OnSchemaChange::AppendNewColumns);
    let stg = shop
        .manifest
        .get("model.shop.stg_orders")
        .unwrap()
        .clone()
        .with_sql(r#"SELECT id AS order_id, amount FROM "memory"."raw"."raw_orders" USING SAMPLE 50%"#);
    shop.manifest.insert(stg);

    let store = DryRunExecutor::new(engine_with_live_fct())
        .execute(&mut shop.manifest)
        .await
        .unwrap();

    assert_eq!(store.failure_count(), 0);
    let stg = store.get("model.shop.stg_orders").unwrap();
    assert_eq!(
        field_names(stg.table.as_ref().unwrap()),
        vec!["order_id", "amount"]
    );
}
