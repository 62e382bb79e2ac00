use sirenia_graph::{EdgeKind, GraphId, LayoutScratch, MainGraph, NodeKind};

#[test]
fn scratch_starts_from_persistent_exclusions() {
    let mut g = MainGraph::new();
    let a = g.add_node(GraphId::ROOT, "a", NodeKind::Class).unwrap();
    let b = g.add_node(GraphId::ROOT, "b", NodeKind::Class).unwrap();
    let ab = g.add_edge("ab", EdgeKind::Relationship, a, b).unwrap();
    g.exclude_node(b).unwrap();

    let scratch = LayoutScratch::new(&g);
    assert!(scratch.is_node_considered(a));
    assert!(!scratch.is_node_considered(b));
    // The edge itself is not hidden, but one endpoint is.
    assert!(scratch.is_edge_marked(ab));
    assert!(!scratch.is_edge_considered(&g, ab));
    assert_eq!(scratch.considered_edges(&g).count(), 0);
}

#[test]
fn reversal_swaps_layout_endpoints_only() {
    let mut g = MainGraph::new();
    let a = g.add_node(GraphId::ROOT, "a", NodeKind::Class).unwrap();
    let b = g.add_node(GraphId::ROOT, "b", NodeKind::Class).unwrap();
    let ab = g.add_edge("ab", EdgeKind::Relationship, a, b).unwrap();

    let mut scratch = LayoutScratch::new(&g);
    scratch.set_reversed(ab, true);
    let edge = g.edge(ab).unwrap();
    assert_eq!(scratch.layout_endpoints(edge), (b, a));
    assert_eq!((edge.source(), edge.target()), (a, b));
}

#[test]
fn reset_clears_run_flags() {
    let mut g = MainGraph::new();
    let a = g.add_node(GraphId::ROOT, "a", NodeKind::Class).unwrap();
    let b = g.add_node(GraphId::ROOT, "b", NodeKind::Class).unwrap();
    let ab = g.add_edge("ab", EdgeKind::Relationship, a, b).unwrap();

    let mut scratch = LayoutScratch::new(&g);
    scratch.set_edge_considered(ab, false);
    scratch.set_reversed(ab, true);
    scratch.pin(a);
    assert!(scratch.is_anchored(&g, a));

    scratch.reset(&g);
    assert!(scratch.is_edge_considered(&g, ab));
    assert!(!scratch.is_reversed(ab));
    assert!(!scratch.is_anchored(&g, a));
}
