use super::{AnchorReference, HashSet};
use sirenia_graph::{LayoutScratch, MainGraph, NodeId};

/// First user-anchored node connected to a free node through a considered edge.
///
/// Only user anchors count: run pins are hints to the engine, not positions the user chose.
pub(super) fn find_reference(
    graph: &MainGraph,
    scratch: &LayoutScratch,
    emitted: &HashSet<NodeId>,
) -> Option<AnchorReference> {
    let anchored = |id: NodeId| graph.node(id).is_some_and(|n| n.geometry.anchored);
    graph
        .nodes()
        .filter(|n| emitted.contains(&n.id()) && n.geometry.anchored)
        .find(|n| {
            graph.incident_edges(n.id()).any(|e| {
                scratch.is_edge_considered(graph, e)
                    && graph
                        .edge(e)
                        .and_then(|edge| edge.opposite(n.id()))
                        .is_some_and(|other| emitted.contains(&other) && !anchored(other))
            })
        })
        .map(|n| AnchorReference {
            node: n.id(),
            position: n.geometry.position,
        })
}
