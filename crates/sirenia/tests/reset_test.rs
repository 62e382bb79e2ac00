mod support;

use futures::executor::block_on;
use sirenia::adapters::step_options;
use sirenia::algo::treeify;
use sirenia::graph::{GraphId, LayoutScratch, MainGraph, Point};
use sirenia::options::{LayoutOptions, keys};
use sirenia::pipeline::{EngineAlgorithm, NodeScope, Phase, StepParams};
use sirenia::transform::{EngineRequest, layout_with_engine};
use sirenia::{
    ExplicitAnchors, RelationKind, Score, Strategy, StrategyConfig, build_main_graph,
};
use support::{DIMS, ScriptedEngine, diagram, geometric, model};

const REL: RelationKind = RelationKind::Relationship;

/// A triangle plus a separate pair: treeify has a cycle to break and two components to chain.
fn two_components() -> MainGraph {
    let m = model(
        &["a", "b", "c", "d", "e"],
        &[
            ("ab", REL, "a", "b"),
            ("bc", REL, "b", "c"),
            ("ca", REL, "c", "a"),
            ("de", REL, "d", "e"),
        ],
    );
    let d = diagram(&[
        ("a", 0.0, 0.0, false),
        ("b", 100.0, 0.0, false),
        ("c", 50.0, 100.0, false),
        ("d", 300.0, 0.0, false),
        ("e", 400.0, 0.0, false),
    ]);
    build_main_graph(&m, &d, &ExplicitAnchors::Existing, &DIMS).unwrap()
}

fn radial_pass(graph: &mut MainGraph, scratch: &mut LayoutScratch) -> Score {
    let tree = treeify(graph, scratch, GraphId::ROOT).unwrap();
    let params = StepParams::from(&StrategyConfig::new(Strategy::Radial));
    let mut options = step_options(EngineAlgorithm::Radial, &params, 0);
    let root = graph.node(tree.root.unwrap()).unwrap();
    options.set(keys::RADIAL_ROOT, root.key());

    let defaults = LayoutOptions::new();
    let request = EngineRequest {
        phase: Phase::Main(0),
        scope: NodeScope::All,
        step_options: options,
        node_defaults: &defaults,
    };
    let engine = ScriptedEngine::new(geometric);
    assert!(block_on(layout_with_engine(&engine, graph, scratch, &request)).unwrap());
    Score::of(graph)
}

fn positions(graph: &MainGraph) -> Vec<(String, Point)> {
    graph
        .nodes()
        .map(|n| (n.key().to_string(), n.geometry.position))
        .collect()
}

#[test]
fn reset_makes_a_second_layout_repeat_the_first() {
    let mut graph = two_components();
    let original_edges = graph.edge_count();
    let mut scratch = LayoutScratch::new(&graph);

    let first = radial_pass(&mut graph, &mut scratch);
    let first_positions = positions(&graph);
    assert!(graph.edge_count() > original_edges);

    graph.reset_for_new_layout();
    scratch.reset(&graph);
    assert_eq!(graph.edge_count(), original_edges);
    assert!(graph.edges().all(|e| !e.is_synthetic()));
    assert_eq!(scratch.considered_edges(&graph).count(), original_edges);

    let second = radial_pass(&mut graph, &mut scratch);
    assert_eq!(second, first);
    assert_eq!(positions(&graph), first_positions);
}
