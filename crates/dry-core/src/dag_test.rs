use super::*;

fn deps(entries: &[(&str, &[&str])]) -> BTreeMap<NodeId, Vec<NodeId>> {
    entries
        .iter()
        .map(|(id, upstream)| {
            (
                NodeId::new(*id),
                upstream.iter().map(|u| NodeId::new(*u)).collect(),
            )
        })
        .collect()
}

fn position(order: &[NodeId], id: &str) -> usize {
    order.iter().position(|n| n == id).unwrap()
}

#[test]
fn test_build_dag() {
    let dag = NodeDag::build(&deps(&[
        ("stg_orders", &[]),
        ("fct_orders", &["stg_orders", "stg_customers"]),
        ("stg_customers", &[]),
    ]))
    .unwrap();
    let order = dag.topological_order().unwrap();

    // fct_orders should come after stg_orders and stg_customers
    assert!(position(&order, "fct_orders") > position(&order, "stg_orders"));
    assert!(position(&order, "fct_orders") > position(&order, "stg_customers"));
}

#[test]
fn test_circular_dependency() {
    let result = NodeDag::build(&deps(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]));
    assert!(matches!(
        result.unwrap_err(),
        CoreError::CircularDependency { .. }
    ));
}

#[test]
fn test_unknown_dependency_is_ignored() {
    let dag = NodeDag::build(&deps(&[("stg_orders", &["source.shop.raw_orders"])])).unwrap();
    assert_eq!(dag.len(), 1);
    assert!(!dag.contains("source.shop.raw_orders"));
    assert!(dag.ancestors("stg_orders").is_empty());
}

#[test]
fn test_ancestors_are_transitive() {
    // raw -> stg -> int -> fct
    let dag = NodeDag::build(&deps(&[
        ("raw", &[]),
        ("stg", &["raw"]),
        ("int", &["stg"]),
        ("fct", &["int"]),
    ]))
    .unwrap();

    let mut ancestors = dag.ancestors("fct");
    ancestors.sort();
    assert_eq!(
        ancestors,
        vec![NodeId::new("int"), NodeId::new("raw"), NodeId::new("stg")]
    );
    assert!(dag.ancestors("raw").is_empty());
    assert!(dag.ancestors("missing").is_empty());
}

#[test]
fn test_diamond_ancestors_not_duplicated() {
    //     a
    //    / \
    //   b   c
    //    \ /
    //     d
    let dag = NodeDag::build(&deps(&[
        ("a", &[]),
        ("b", &["a"]),
        ("c", &["a"]),
        ("d", &["b", "c"]),
    ]))
    .unwrap();
    assert_eq!(dag.ancestors("d").len(), 3);
}
