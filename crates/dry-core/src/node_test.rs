use super::*;

fn stg_orders() -> Node {
    Node::new(
        "model.shop.stg_orders",
        ResourceType::Model,
        "analytics",
        "staging",
        "stg_orders",
    )
}

#[test]
fn test_identifier_falls_back_to_name() {
    let mut node = stg_orders();
    assert_eq!(node.identifier(), "stg_orders");

    node.alias = Some("orders_v2".to_string());
    assert_eq!(node.identifier(), "orders_v2");
}

#[test]
fn test_qualified_name_is_quoted() {
    let node = stg_orders();
    assert_eq!(
        node.qualified_name(),
        r#""analytics"."staging"."stg_orders""#
    );
}

#[test]
fn test_on_schema_change_defaults_to_ignore() {
    let node = stg_orders().with_materialized(Materialization::Incremental);
    assert_eq!(node.on_schema_change(), OnSchemaChange::Ignore);

    let node = node.with_on_schema_change(OnSchemaChange::Fail);
    assert_eq!(node.on_schema_change(), OnSchemaChange::Fail);
}

#[test]
fn test_deep_nodes_unset_by_default() {
    let node = stg_orders();
    assert!(node.deep_nodes().is_none());

    let node = node.with_deep_nodes(vec![]);
    assert_eq!(node.deep_nodes(), Some(&[][..]));
}

#[test]
fn test_deserialize_with_compiled_code_alias() {
    let json = r#"{
        "unique_id": "model.shop.fct_orders",
        "resource_type": "model",
        "name": "fct_orders",
        "database": "analytics",
        "schema": "marts",
        "compiled_code": "SELECT 1 AS id",
        "config": {"materialized": "incremental", "on_schema_change": "append_new_columns"},
        "depends_on": {"nodes": ["model.shop.stg_orders"]}
    }"#;
    let node: Node = serde_json::from_str(json).unwrap();
    assert_eq!(node.compiled_sql.as_deref(), Some("SELECT 1 AS id"));
    assert_eq!(node.materialized(), Materialization::Incremental);
    assert_eq!(node.on_schema_change(), OnSchemaChange::AppendNewColumns);
    assert_eq!(node.depends_on.nodes, vec![NodeId::new("model.shop.stg_orders")]);
    assert!(node.deep_nodes().is_none());
}

#[test]
fn test_unknown_resource_type_is_other() {
    let json = r#"{
        "unique_id": "test.shop.not_null_id",
        "resource_type": "test",
        "name": "not_null_id",
        "database": "analytics",
        "schema": "dbt_test"
    }"#;
    let node: Node = serde_json::from_str(json).unwrap();
    assert_eq!(node.resource_type, ResourceType::Other);
}

#[test]
fn test_file_path_joins_root() {
    let mut node = Node::new("seed.shop.raw", ResourceType::Seed, "db", "raw", "raw");
    assert!(node.file_path().is_none());

    node.original_file_path = Some("seeds/raw.csv".to_string());
    assert_eq!(node.file_path().unwrap(), PathBuf::from("seeds/raw.csv"));

    node.root_path = Some("/project".to_string());
    assert_eq!(
        node.file_path().unwrap(),
        PathBuf::from("/project/seeds/raw.csv")
    );
}

#[test]
fn test_materialization_display() {
    assert_eq!(Materialization::View.to_string(), "view");
    assert_eq!(Materialization::Incremental.to_string(), "incremental");
    assert_eq!(
        OnSchemaChange::SyncAllColumns.to_string(),
        "sync_all_columns"
    );
}
