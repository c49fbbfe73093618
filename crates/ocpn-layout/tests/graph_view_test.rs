use ocpn_layout::graph_view::GraphView;

fn triangle() -> GraphView {
    GraphView::new(["a", "b", "c"], [("a", "b"), ("b", "c"), ("a", "c")])
}

#[test]
fn graph_view_reports_degrees() {
    let g = triangle();
    assert_eq!(g.len(), 3);
    assert_eq!(g.out_degree("a"), 2);
    assert_eq!(g.in_degree("a"), 0);
    assert_eq!(g.in_degree("c"), 2);
    assert_eq!(g.delta("a"), 2);
    assert_eq!(g.delta("b"), 0);
    assert_eq!(g.delta("c"), -2);
}

#[test]
fn graph_view_remove_node_cascades_to_incident_arcs() {
    let mut g = triangle();
    assert!(g.remove_node("b"));
    assert!(!g.contains("b"));
    assert_eq!(g.out_degree("a"), 1);
    assert_eq!(g.in_degree("c"), 1);
    assert!(!g.remove_node("b"));
}

#[test]
fn graph_view_finds_sinks_and_sources_in_insertion_order() {
    let g = GraphView::new(["x", "s1", "s2"], [("x", "s1"), ("x", "s2")]);
    assert_eq!(g.any_sink(), Some("s1"));
    assert_eq!(g.any_source(), Some("x"));

    let g = GraphView::new(["x", "y"], [("x", "y"), ("y", "x")]);
    assert_eq!(g.any_sink(), None);
    assert_eq!(g.any_source(), None);
}

#[test]
fn graph_view_max_out_minus_in_prefers_the_first_node_on_ties() {
    let g = GraphView::new(["y", "x"], [("x", "y"), ("y", "x")]);
    assert_eq!(g.max_out_minus_in_node(), Some("y"));

    let g = triangle();
    assert_eq!(g.max_out_minus_in_node(), Some("a"));
}

#[test]
fn graph_view_ignores_arcs_with_unknown_endpoints() {
    let g = GraphView::new(["a", "b"], [("a", "b"), ("a", "zzz")]);
    assert_eq!(g.out_degree("a"), 1);
    assert!(!g.contains("zzz"));
}

#[test]
fn graph_view_remove_nodes_empties_the_view() {
    let mut g = triangle();
    g.remove_nodes(["a", "b", "c"]);
    assert!(g.is_empty());
    assert_eq!(g.any_sink(), None);
    assert_eq!(g.max_out_minus_in_node(), None);
}
