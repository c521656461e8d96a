use super::*;
use dry_core::{Field, FieldMode, ResourceType};

fn stg_orders() -> Node {
    Node::new(
        "model.shop.stg_orders",
        ResourceType::Model,
        "memory",
        "staging",
        "stg_orders",
    )
}

fn customers() -> Node {
    Node::new(
        "model.shop.customers",
        ResourceType::Model,
        "memory",
        "staging",
        "customers",
    )
}

fn orders_table() -> Table {
    Table::new(vec![
        Field::new("order_id", "INTEGER"),
        Field::new("amount", "DECIMAL(10,2)"),
    ])
}

#[test]
fn test_select_literal_nested_and_repeated() {
    let table = Table::new(vec![
        Field::new("tags", "VARCHAR").with_mode(FieldMode::Repeated),
        Field::nested("address", vec![Field::new("city", "VARCHAR")]),
    ]);
    assert_eq!(
        select_literal(&table),
        r#"SELECT CAST(NULL AS VARCHAR[]) AS "tags", CAST(NULL AS STRUCT("city" VARCHAR)) AS "address""#
    );
}

#[test]
fn test_replace_three_part_reference() {
    let sql = r#"SELECT order_id, amount FROM "memory"."staging"."stg_orders""#;
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();

    assert!(!result.contains(r#""staging"."stg_orders""#), "got: {}", result);
    assert!(
        result.contains(r#"CAST(NULL AS INTEGER) AS "order_id""#),
        "got: {}",
        result
    );
    assert!(result.contains(r#") AS "stg_orders""#), "got: {}", result);
}

#[test]
fn test_replace_two_part_reference_case_insensitive() {
    let sql = "SELECT o.order_id FROM STAGING.Stg_Orders o";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();

    assert!(!result.to_lowercase().contains("staging.stg_orders"), "got: {}", result);
    assert!(result.contains("AS o"), "got: {}", result);
    assert!(!result.contains(r#"AS "stg_orders""#), "got: {}", result);
}

#[test]
fn test_replace_every_occurrence() {
    let sql = "SELECT a.order_id FROM staging.stg_orders a JOIN staging.stg_orders b ON a.order_id = b.order_id";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();

    assert_eq!(result.matches(r#"AS "amount""#).count(), 2, "got: {}", result);
    assert!(!result.contains(PLACEHOLDER_PREFIX));
}

#[test]
fn test_replace_inside_cte() {
    let sql = "WITH src AS (SELECT * FROM memory.staging.stg_orders) SELECT order_id FROM src";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();

    assert!(!result.contains("memory.staging.stg_orders"), "got: {}", result);
    assert!(result.contains("FROM src"), "got: {}", result);
}

#[test]
fn test_unreferenced_upstream_returns_input_unchanged() {
    let sql = "SELECT   id FROM staging.other_model  ";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(result, sql);
}

#[test]
fn test_bare_name_not_matched() {
    let sql = "SELECT id FROM stg_orders";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(result, sql);
}

#[test]
fn test_different_schema_not_matched() {
    let sql = "SELECT id FROM marts.stg_orders";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(result, sql);
}

#[test]
fn test_alias_used_for_matching() {
    let mut upstream = stg_orders();
    upstream.alias = Some("orders_v2".to_string());

    let sql = "SELECT order_id FROM staging.orders_v2";
    let result = replace_upstream_sql(sql, &upstream, &orders_table()).unwrap();
    assert!(result.contains(r#") AS "orders_v2""#), "got: {}", result);
}

#[test]
fn test_empty_table_is_noop() {
    let sql = "SELECT order_id FROM staging.stg_orders";
    let result = replace_upstream_sql(sql, &stg_orders(), &Table::default()).unwrap();
    assert_eq!(result, sql);
}

#[test]
fn test_substitution_is_idempotent() {
    let sql = "SELECT order_id FROM staging.stg_orders";
    let once = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    let twice = replace_upstream_sql(&once, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_substitution_order_does_not_matter() {
    let sql = "SELECT o.order_id, c.name FROM staging.stg_orders o JOIN staging.customers c ON o.order_id = c.id";
    let customers_table = Table::new(vec![
        Field::new("id", "INTEGER"),
        Field::new("name", "VARCHAR"),
    ]);

    let orders_first = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    let orders_first = replace_upstream_sql(&orders_first, &customers(), &customers_table).unwrap();

    let customers_first = replace_upstream_sql(sql, &customers(), &customers_table).unwrap();
    let customers_first =
        replace_upstream_sql(&customers_first, &stg_orders(), &orders_table()).unwrap();

    assert_eq!(orders_first, customers_first);
}

#[test]
fn test_unparseable_sql_falls_back_to_tokens() {
    let sql = "SELECT order_id FROM memory.staging.stg_orders USING SAMPLE 10%";
    assert!(SqlParser::duckdb().parse(sql).is_err());

    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(
        result,
        r#"SELECT order_id FROM (SELECT CAST(NULL AS INTEGER) AS "order_id", CAST(NULL AS DECIMAL(10,2)) AS "amount") AS "stg_orders" USING SAMPLE 10%"#
    );
}

#[test]
fn test_token_fallback_keeps_alias_and_quoting() {
    let sql = r#"SELECT s.order_id FROM "memory"."staging"."stg_orders" AS s, STAGING.STG_ORDERS o2 USING SAMPLE 5 ROWS"#;
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();

    assert_eq!(result.matches(r#"AS "amount")"#).count(), 2, "got: {}", result);
    assert!(result.contains(r#") AS s,"#), "got: {}", result);
    assert!(result.contains(r#") o2 USING"#), "got: {}", result);
    assert!(!result.contains(r#"AS "stg_orders""#), "got: {}", result);
}

#[test]
fn test_token_fallback_skips_strings_and_longer_names() {
    let sql = "SELECT 'staging.stg_orders' AS label, staging.stg_orders.order_id FROM x USING SAMPLE 1%";
    let result = replace_upstream_sql(sql, &stg_orders(), &orders_table()).unwrap();
    assert_eq!(result, sql);
}

#[test]
fn test_untokenizable_sql_is_error() {
    let result = replace_upstream_sql(
        "SELECT 'oops FROM staging.stg_orders",
        &stg_orders(),
        &orders_table(),
    );
    assert!(matches!(
        result,
        Err(crate::error::SqlError::ParseError { .. })
    ));
}
