use sirenia::Score;
use sirenia::graph::{EdgeId, EdgeKind, Geometry, GraphId, MainGraph, NodeId, NodeKind, Point};
use sirenia::metrics::{edge_crossings, edge_node_crossings};

fn node(g: &mut MainGraph, key: &str, x: f64, y: f64) -> NodeId {
    let id = g.add_node(GraphId::ROOT, key, NodeKind::Class).unwrap();
    g.node_mut(id).unwrap().geometry = Geometry::at(x, y).with_size(10.0, 10.0);
    id
}

fn edge(g: &mut MainGraph, key: &str, s: NodeId, t: NodeId) -> EdgeId {
    g.add_edge(key, EdgeKind::Relationship, s, t).unwrap()
}

#[test]
fn crossing_diagonals_count_once() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "a", 0.0, 0.0);
    let b = node(&mut g, "b", 100.0, 0.0);
    let c = node(&mut g, "c", 0.0, 100.0);
    let d = node(&mut g, "d", 100.0, 100.0);
    edge(&mut g, "ad", a, d);
    edge(&mut g, "bc", b, c);

    assert_eq!(edge_crossings(&g), 1);
    assert_eq!(edge_node_crossings(&g), 0);
    assert_eq!(
        Score::of(&g),
        Score {
            edge_crossings: 1,
            edge_node_crossings: 0
        }
    );
}

#[test]
fn edges_sharing_an_endpoint_never_cross() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "a", 0.0, 0.0);
    let b = node(&mut g, "b", 100.0, 0.0);
    let c = node(&mut g, "c", 100.0, 100.0);
    edge(&mut g, "ab", a, b);
    edge(&mut g, "ac", a, c);
    edge(&mut g, "bc", b, c);

    assert_eq!(edge_crossings(&g), 0);
}

#[test]
fn edges_through_unrelated_nodes_count() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "a", 0.0, 0.0);
    let b = node(&mut g, "b", 200.0, 0.0);
    node(&mut g, "m", 100.0, 0.0);
    let e = edge(&mut g, "ab", a, b);

    assert_eq!(edge_node_crossings(&g), 1);

    g.edge_mut(e).unwrap().waypoints = vec![Point::new(5.0, 60.0), Point::new(205.0, 60.0)];
    assert_eq!(edge_node_crossings(&g), 0);
}

#[test]
fn waypoints_create_and_remove_crossings() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "a", 0.0, 0.0);
    let b = node(&mut g, "b", 200.0, 0.0);
    let c = node(&mut g, "c", 100.0, -100.0);
    let d = node(&mut g, "d", 100.0, 100.0);
    edge(&mut g, "ab", a, b);
    let cd = edge(&mut g, "cd", c, d);
    assert_eq!(edge_crossings(&g), 1);

    g.edge_mut(cd).unwrap().waypoints = vec![Point::new(300.0, -95.0), Point::new(300.0, 105.0)];
    assert_eq!(edge_crossings(&g), 0);
}

#[test]
fn synthetic_and_excluded_elements_are_ignored() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "a", 0.0, 0.0);
    let b = node(&mut g, "b", 100.0, 0.0);
    let c = node(&mut g, "c", 0.0, 100.0);
    let d = node(&mut g, "d", 100.0, 100.0);
    g.add_synthetic_edge(a, d).unwrap();
    let bc = edge(&mut g, "bc", b, c);
    let ad = edge(&mut g, "ad", a, d);
    assert_eq!(edge_crossings(&g), 1);

    g.exclude_edge(ad).unwrap();
    assert_eq!(edge_crossings(&g), 0);
    assert_eq!(Score::of(&g).total(), 0);

    g.exclude_edge(bc).unwrap();
    let m = node(&mut g, "m", 45.0, 0.0);
    let e = node(&mut g, "e", 200.0, 0.0);
    edge(&mut g, "ae", a, e);
    assert_eq!(edge_node_crossings(&g), 2);
    g.exclude_node(m).unwrap();
    assert_eq!(edge_node_crossings(&g), 1);
}
