//! Graph algorithms that prepare a graph for the engine.
//!
//! All of them work on one nesting level. Edges whose endpoints sit deeper inside a subgraph
//! are attributed to the endpoint's container on that level.

pub mod clusterify;
pub mod root;
pub mod sector;
pub mod treeify;

pub use clusterify::{Clusters, cluster_nodes, clusterify};
pub use root::{RootSelection, select_root};
pub use sector::{SectorPopulation, sector_population};
pub use treeify::{Treeified, treeify};

use sirenia_graph::{EdgeId, GraphId, LayoutScratch, MainGraph, NodeId};

/// A considered edge lifted to `level`: its endpoints replaced by their representatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Considered edges between distinct considered members of `level`, in edge insertion order.
pub(crate) fn level_edges(
    graph: &MainGraph,
    scratch: &LayoutScratch,
    level: GraphId,
) -> Vec<LevelEdge> {
    scratch
        .considered_edges(graph)
        .filter_map(|e| {
            let source = graph.representative(e.source(), level)?;
            let target = graph.representative(e.target(), level)?;
            let usable = source != target
                && scratch.is_node_considered(source)
                && scratch.is_node_considered(target);
            usable.then_some(LevelEdge {
                id: e.id(),
                source,
                target,
            })
        })
        .collect()
}

/// Considered direct members of `level`, in insertion order.
pub(crate) fn level_nodes(
    graph: &MainGraph,
    scratch: &LayoutScratch,
    level: GraphId,
) -> Vec<NodeId> {
    graph
        .graph(level)
        .map(|g| g.nodes().filter(|&n| scratch.is_node_considered(n)).collect())
        .unwrap_or_default()
}
