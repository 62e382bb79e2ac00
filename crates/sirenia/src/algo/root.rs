//! Root selection for tree-shaped layouts.

use super::{LevelEdge, level_edges, level_nodes};
use rustc_hash::FxBuildHasher;
use sirenia_graph::{GraphId, LayoutScratch, MainGraph, NodeId};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootSelection {
    /// Highest number of incoming plus outgoing considered edges.
    #[default]
    MostEdges,
}

/// Picks the root of `level`; ties go to the node inserted first.
pub fn select_root(
    graph: &MainGraph,
    scratch: &LayoutScratch,
    level: GraphId,
    heuristic: RootSelection,
) -> Option<NodeId> {
    let nodes = level_nodes(graph, scratch, level);
    let edges = level_edges(graph, scratch, level);
    select_among(&nodes, &edges, heuristic)
}

pub(crate) fn select_among(
    candidates: &[NodeId],
    edges: &[LevelEdge],
    heuristic: RootSelection,
) -> Option<NodeId> {
    match heuristic {
        RootSelection::MostEdges => {
            let mut degree: HashMap<NodeId, usize> = HashMap::default();
            for e in edges {
                *degree.entry(e.source).or_default() += 1;
                *degree.entry(e.target).or_default() += 1;
            }
            let mut best: Option<(NodeId, usize)> = None;
            for &candidate in candidates {
                let d = degree.get(&candidate).copied().unwrap_or(0);
                if best.is_none_or(|(_, top)| d > top) {
                    best = Some((candidate, d));
                }
            }
            best.map(|(node, _)| node)
        }
    }
}
