mod support;

use futures::executor::block_on;
use sirenia::graph::{
    EdgeKind, Geometry, GraphId, LayoutScratch, MainGraph, NodeId, NodeKind, Point,
};
use sirenia::options::{LayoutOptions, keys};
use sirenia::pipeline::{NodeScope, Phase};
use sirenia::transform::{EngineRequest, layout_with_engine, to_engine_graph};
use sirenia::{EngineError, EngineGraph, Error};
use support::{ScriptedEngine, identity, move_to};

fn node(g: &mut MainGraph, key: &str, x: f64, y: f64) -> NodeId {
    let id = g.add_node(GraphId::ROOT, key, NodeKind::Class).unwrap();
    g.node_mut(id).unwrap().geometry = Geometry::at(x, y).with_size(40.0, 20.0);
    id
}

fn request(defaults: &LayoutOptions) -> EngineRequest<'_> {
    EngineRequest {
        phase: Phase::Main(0),
        scope: NodeScope::All,
        step_options: LayoutOptions::new().with(keys::ALGORITHM, "stress"),
        node_defaults: defaults,
    }
}

fn position(g: &MainGraph, key: &str) -> Point {
    g.node_by_key(key).unwrap().geometry.position
}

#[test]
fn engine_drift_is_undone_at_the_anchor() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 100.0, 100.0);
    let b = node(&mut g, "B", 0.0, 0.0);
    g.node_mut(a).unwrap().geometry.anchored = true;
    let e = g.add_edge("AB", EdgeKind::Relationship, a, b).unwrap();
    let scratch = LayoutScratch::new(&g);

    let engine = ScriptedEngine::new(|graph: EngineGraph| {
        let mut graph = move_to(&[("A", 140.0, 160.0), ("B", 300.0, 200.0)])(graph)?.unwrap();
        graph.find_edge_mut("AB").unwrap().bend_points = vec![Point::new(200.0, 180.0)];
        Ok(Some(graph))
    });
    let defaults = LayoutOptions::new();
    let applied = block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults)));

    assert!(applied.unwrap());
    assert_eq!(position(&g, "A"), Point::new(100.0, 100.0));
    assert_eq!(position(&g, "B"), Point::new(260.0, 140.0));
    assert_eq!(g.edge(e).unwrap().waypoints, vec![Point::new(160.0, 120.0)]);
}

#[test]
fn anchors_without_free_neighbours_give_no_reference() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 100.0, 100.0);
    let b = node(&mut g, "B", 0.0, 0.0);
    g.node_mut(a).unwrap().geometry.anchored = true;
    g.node_mut(b).unwrap().geometry.anchored = true;
    g.add_edge("AB", EdgeKind::Relationship, a, b).unwrap();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let (_, manifest) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    assert_eq!(manifest.reference(), None);

    let engine = ScriptedEngine::new(move_to(&[("A", 140.0, 160.0)]));
    block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults))).unwrap();
    assert_eq!(position(&g, "A"), Point::new(140.0, 160.0));
}

#[test]
fn anchored_nodes_are_marked_fixed() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 0.0, 0.0);
    let b = node(&mut g, "B", 0.0, 0.0);
    g.node_mut(a).unwrap().geometry.anchored = true;
    let mut scratch = LayoutScratch::new(&g);
    scratch.pin(b);
    let defaults = LayoutOptions::new().with(keys::NODE_SPACING, 10);

    let (out, _) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    let a = out.find_node("A").unwrap();
    assert_eq!(a.options.get(keys::FIXED), Some("true"));
    assert_eq!(a.options.get(keys::NODE_SPACING), Some("10"));
    assert_eq!(out.find_node("B").unwrap().options.get(keys::FIXED), Some("true"));
    assert_eq!(out.algorithm(), Some("stress"));
}

#[test]
fn reversed_edges_are_emitted_backwards_and_read_back_forwards() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 0.0, 0.0);
    let b = node(&mut g, "B", 100.0, 0.0);
    let e = g.add_edge("AB", EdgeKind::Relationship, a, b).unwrap();
    let mut scratch = LayoutScratch::new(&g);
    scratch.set_reversed(e, true);
    let defaults = LayoutOptions::new();

    let (out, _) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    let (_, edge) = out.edges()[0];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("B", "A"));

    let engine = ScriptedEngine::new(|mut graph: EngineGraph| {
        graph.find_edge_mut("AB").unwrap().bend_points =
            vec![Point::new(90.0, 5.0), Point::new(10.0, 5.0)];
        Ok(Some(graph))
    });
    block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults))).unwrap();
    assert_eq!(
        g.edge(e).unwrap().waypoints,
        vec![Point::new(10.0, 5.0), Point::new(90.0, 5.0)]
    );
    // Reversal is a layout concern only.
    assert_eq!(g.edge(e).unwrap().source(), a);
}

#[test]
fn hidden_nodes_and_their_edges_are_omitted() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 0.0, 0.0);
    let b = node(&mut g, "B", 0.0, 0.0);
    let c = node(&mut g, "C", 0.0, 0.0);
    g.add_edge("AB", EdgeKind::Relationship, a, b).unwrap();
    g.add_edge("BC", EdgeKind::Relationship, b, c).unwrap();
    g.exclude_node(c).unwrap();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let (out, manifest) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    let ids: Vec<&str> = out.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);
    let edges: Vec<&str> = out.edges().iter().map(|(_, e)| e.id.as_str()).collect();
    assert_eq!(edges, ["AB"]);
    assert!(!manifest.is_emitted(c));
}

#[test]
fn profile_nodes_are_labelled_apart() {
    let mut g = MainGraph::new();
    node(&mut g, "A", 0.0, 0.0);
    let p = g.add_node(GraphId::ROOT, "P", NodeKind::Profile).unwrap();
    g.node_mut(p).unwrap().geometry = Geometry::at(0.0, 0.0).with_size(40.0, 20.0);
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let (out, _) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    assert_eq!(out.find_node("A").unwrap().label, "A");
    assert_eq!(out.find_node("P").unwrap().label, "<<profile>> P");

    let profile_only = EngineRequest {
        scope: NodeScope::Profile,
        ..request(&defaults)
    };
    let (out, _) = to_engine_graph(&g, &scratch, &profile_only).unwrap();
    assert!(out.find_node("A").is_none());
    assert!(out.find_node("P").is_some());
}

#[test]
fn profile_steps_reach_profiles_nested_in_subgraphs() {
    let mut g = MainGraph::new();
    let p = g.add_node(GraphId::ROOT, "P", NodeKind::Profile).unwrap();
    g.node_mut(p).unwrap().geometry = Geometry::at(0.0, 0.0).with_size(40.0, 20.0);
    let q = node(&mut g, "Q", 100.0, 0.0);
    node(&mut g, "R", 300.0, 0.0);
    g.add_edge("PQ", EdgeKind::Generalization, p, q).unwrap();
    let container = g.create_generalization_subgraphs().unwrap()[0];
    let key = g.node(container).unwrap().key().to_string();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();
    let profile_only = EngineRequest {
        scope: NodeScope::Profile,
        ..request(&defaults)
    };

    let (out, manifest) = to_engine_graph(&g, &scratch, &profile_only).unwrap();

    let roots: Vec<&str> = out.root.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(roots, [key.as_str()]);
    let inner: Vec<&str> = out.root.children[0]
        .children
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(inner, ["P"]);
    assert!(manifest.is_emitted(p));
    assert!(!manifest.is_emitted(q));
}

#[test]
fn missing_dimensions_are_fatal() {
    let mut g = MainGraph::new();
    g.add_node(GraphId::ROOT, "A", NodeKind::Class).unwrap();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let err = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingDimension { ref node, dimension: "width" } if node == "A"
    ));
}

fn generalization_graph() -> (MainGraph, NodeId) {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 120.0, 130.0);
    let b = node(&mut g, "B", 200.0, 130.0);
    let x = node(&mut g, "X", 0.0, 0.0);
    g.add_edge("AB", EdgeKind::Generalization, a, b).unwrap();
    g.add_edge("XA", EdgeKind::Relationship, x, a).unwrap();
    let created = g.create_generalization_subgraphs().unwrap();
    (g, created[0])
}

#[test]
fn subgraphs_not_targeted_by_the_step_stay_fixed() {
    let (g, container) = generalization_graph();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let (out, manifest) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    let key = g.node(container).unwrap().key().to_string();
    let sub = out.find_node(&key).unwrap();
    assert_eq!(sub.options.get(keys::ALGORITHM), Some("fixed"));
    assert_eq!(out.algorithm(), Some("stress"));
    assert_eq!(manifest.targeted(), &[GraphId::ROOT]);

    // Children are relative to their container.
    let origin = g.node(container).unwrap().geometry.position;
    let child = sub.children.iter().find(|c| c.id == "A").unwrap();
    assert_eq!((child.x, child.y), (120.0 - origin.x, 130.0 - origin.y));
}

#[test]
fn generalization_steps_target_subgraphs_only_until_laid_out() {
    let (mut g, container) = generalization_graph();
    let inner = g.node(container).unwrap().subgraph().unwrap();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();
    let step = EngineRequest {
        phase: Phase::PreMain(1),
        scope: NodeScope::Generalization,
        ..request(&defaults)
    };

    let (out, _) = to_engine_graph(&g, &scratch, &step).unwrap();
    assert_eq!(out.algorithm(), Some("fixed"));
    let key = g.node(container).unwrap().key().to_string();
    assert_eq!(
        out.find_node(&key).unwrap().options.get(keys::ALGORITHM),
        Some("stress")
    );

    block_on(layout_with_engine(
        &ScriptedEngine::new(identity),
        &mut g,
        &scratch,
        &step,
    ))
    .unwrap();
    assert!(g.graph(inner).unwrap().is_laid_out());

    let later = EngineRequest {
        phase: Phase::Main(0),
        ..step
    };
    let (out, manifest) = to_engine_graph(&g, &scratch, &later).unwrap();
    assert_eq!(
        out.find_node(&key).unwrap().options.get(keys::ALGORITHM),
        Some("fixed")
    );
    assert!(manifest.targeted().is_empty());
}

#[test]
fn edges_into_subgraphs_attach_to_the_container() {
    let (g, container) = generalization_graph();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let (out, _) = to_engine_graph(&g, &scratch, &request(&defaults)).unwrap();
    let key = g.node(container).unwrap().key().to_string();
    let edges = out.edges();
    let (holder, split) = edges.iter().find(|(_, e)| e.id == "XA~split").unwrap();
    assert_eq!(*holder, "root");
    assert_eq!((split.source.as_str(), split.target.as_str()), ("X", key.as_str()));
    let (holder, inner) = edges.iter().find(|(_, e)| e.id == "AB").unwrap();
    assert_eq!(*holder, key.as_str());
    assert_eq!((inner.source.as_str(), inner.target.as_str()), ("A", "B"));
}

#[test]
fn nested_offsets_accumulate_on_the_way_back() {
    let (mut g, container) = generalization_graph();
    let key = g.node(container).unwrap().key().to_string();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let engine = ScriptedEngine::new(move |mut graph: EngineGraph| {
        let sub = graph.find_node_mut(&key).unwrap();
        sub.x = 300.0;
        sub.y = 300.0;
        let child = sub.children.iter_mut().find(|c| c.id == "A").unwrap();
        child.x = 20.0;
        child.y = 30.0;
        Ok(Some(graph))
    });
    block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults))).unwrap();

    assert_eq!(g.node(container).unwrap().geometry.position, Point::new(300.0, 300.0));
    assert_eq!(position(&g, "A"), Point::new(320.0, 330.0));
}

#[test]
fn no_layout_leaves_the_graph_untouched() {
    let mut g = MainGraph::new();
    let a = node(&mut g, "A", 5.0, 5.0);
    let b = node(&mut g, "B", 50.0, 5.0);
    g.add_edge("AB", EdgeKind::Relationship, a, b).unwrap();
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let engine = ScriptedEngine::new(|_| Ok(None));
    let applied =
        block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults))).unwrap();
    assert!(!applied);
    assert_eq!(position(&g, "A"), Point::new(5.0, 5.0));
    assert_eq!(position(&g, "B"), Point::new(50.0, 5.0));
}

#[test]
fn unknown_result_nodes_are_never_invented() {
    let mut g = MainGraph::new();
    node(&mut g, "A", 0.0, 0.0);
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let engine = ScriptedEngine::new(|mut graph: EngineGraph| {
        graph.root.children.push(sirenia::EngineNode {
            id: "ghost".into(),
            x: 10.0,
            y: 10.0,
            width: 1.0,
            height: 1.0,
            ..Default::default()
        });
        graph.find_node_mut("A").unwrap().x = 7.0;
        Ok(Some(graph))
    });
    block_on(layout_with_engine(&engine, &mut g, &scratch, &request(&defaults))).unwrap();
    assert_eq!(g.node_count(), 1);
    assert!(g.find_node("ghost").is_none());
    assert_eq!(position(&g, "A"), Point::new(7.0, 0.0));
}

#[test]
fn engine_failures_and_garbage_propagate() {
    let mut g = MainGraph::new();
    node(&mut g, "A", 0.0, 0.0);
    let scratch = LayoutScratch::new(&g);
    let defaults = LayoutOptions::new();

    let failing = ScriptedEngine::new(|_| Err(EngineError::TimedOut));
    let err =
        block_on(layout_with_engine(&failing, &mut g, &scratch, &request(&defaults))).unwrap_err();
    assert!(matches!(err, Error::Engine(EngineError::TimedOut)));

    let garbage = ScriptedEngine::new(|mut graph: EngineGraph| {
        graph.find_node_mut("A").unwrap().x = f64::NAN;
        Ok(Some(graph))
    });
    let err =
        block_on(layout_with_engine(&garbage, &mut g, &scratch, &request(&defaults))).unwrap_err();
    assert!(matches!(err, Error::Engine(EngineError::Malformed { .. })));
    assert_eq!(position(&g, "A"), Point::ORIGIN);
}
