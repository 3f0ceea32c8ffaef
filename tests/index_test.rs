use weftdb::graph::{Graph, NodeId, PropertyValue};

fn sorted(mut ids: Vec<NodeId>) -> Vec<NodeId> {
    ids.sort();
    ids
}

#[test]
fn index_round_trip_follows_property_mutations() {
    let g = Graph::new();
    g.create_index("k");

    let a = g.create_node();
    let b = g.create_node();
    let x = PropertyValue::Integer(10);
    let y = PropertyValue::Integer(20);

    g.get_node(a).unwrap().set_property("k", x.clone(), g.indexes());
    g.get_node(b).unwrap().set_property("k", x.clone(), g.indexes());
    assert_eq!(sorted(g.find_nodes("k", &x)), vec![a, b]);

    // Re-pointing a's value moves its entry, atomically per the index.
    g.get_node(a).unwrap().set_property("k", y.clone(), g.indexes());
    assert_eq!(g.find_nodes("k", &x), vec![b]);
    assert_eq!(g.find_nodes("k", &y), vec![a]);

    // Removing b's property drops the last entry for X.
    g.get_node(b).unwrap().remove_property("k", g.indexes());
    assert!(g.find_nodes("k", &x).is_empty());
    assert_eq!(g.find_nodes("k", &y), vec![a]);
}

#[test]
fn index_created_after_properties_only_sees_new_writes() {
    // Indexes are maintained forward from creation; there is no backfill.
    let g = Graph::new();
    let a = g.create_node();
    g.get_node(a).unwrap().set_property("k", 1i64, g.indexes());

    g.create_index("k");
    assert!(g.find_nodes("k", &PropertyValue::Integer(1)).is_empty());

    g.get_node(a).unwrap().set_property("k", 1i64, g.indexes());
    assert_eq!(g.find_nodes("k", &PropertyValue::Integer(1)), vec![a]);
}

#[test]
fn removing_a_node_purges_its_index_entries() {
    let g = Graph::new();
    g.create_index("name");
    let a = g.create_node();
    let b = g.create_node();
    let val = PropertyValue::Text("x".into());
    g.get_node(a).unwrap().set_property("name", val.clone(), g.indexes());
    g.get_node(b).unwrap().set_property("name", val.clone(), g.indexes());

    g.remove_node(a);
    assert_eq!(g.find_nodes("name", &val), vec![b]);
}

#[test]
fn removing_an_edge_purges_its_index_entries() {
    let g = Graph::new();
    g.create_index("kind");
    let a = g.create_node();
    let b = g.create_node();
    let e = g.create_edge(a, b, "L").unwrap();
    let val = PropertyValue::Text("road".into());
    g.get_edge(e).unwrap().set_property("kind", val.clone(), g.indexes());
    assert_eq!(g.find_edges("kind", &val), vec![e]);

    g.remove_edge(e);
    assert!(g.find_edges("kind", &val).is_empty());
}

#[test]
fn cascaded_edges_are_purged_from_indexes() {
    let g = Graph::new();
    g.create_index("kind");
    let a = g.create_node();
    let b = g.create_node();
    let e = g.create_edge(a, b, "L").unwrap();
    let val = PropertyValue::Text("road".into());
    g.get_edge(e).unwrap().set_property("kind", val.clone(), g.indexes());

    // Node removal cascades into edge removal, which must clean the index.
    g.remove_node(a);
    assert!(g.find_edges("kind", &val).is_empty());
}

#[test]
fn node_and_edge_entries_stay_separate() {
    let g = Graph::new();
    g.create_index("shared");
    let a = g.create_node();
    let b = g.create_node();
    let e = g.create_edge(a, b, "L").unwrap();

    let val = PropertyValue::Integer(5);
    g.get_node(a).unwrap().set_property("shared", val.clone(), g.indexes());
    g.get_edge(e).unwrap().set_property("shared", val.clone(), g.indexes());

    assert_eq!(g.find_nodes("shared", &val), vec![a]);
    assert_eq!(g.find_edges("shared", &val), vec![e]);
}

#[test]
fn values_of_different_types_never_collide() {
    let g = Graph::new();
    g.create_index("v");
    let a = g.create_node();
    let b = g.create_node();
    g.get_node(a).unwrap().set_property("v", 1i64, g.indexes());
    g.get_node(b).unwrap().set_property("v", 1.0f64, g.indexes());

    assert_eq!(g.find_nodes("v", &PropertyValue::Integer(1)), vec![a]);
    assert_eq!(g.find_nodes("v", &PropertyValue::Float(1.0)), vec![b]);
}

#[test]
fn find_without_index_is_empty() {
    let g = Graph::new();
    let a = g.create_node();
    g.get_node(a).unwrap().set_property("k", 1i64, g.indexes());
    assert!(g.find_nodes("k", &PropertyValue::Integer(1)).is_empty());
    assert!(g.find_edges("k", &PropertyValue::Integer(1)).is_empty());
}
