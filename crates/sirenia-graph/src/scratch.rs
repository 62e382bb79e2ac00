//! Per-run layout flags kept beside the graph instead of on its entities.

use crate::graph::{Edge, EdgeId, MainGraph, Node, NodeId};
use rustc_hash::FxBuildHasher;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Side table describing how the current run sees a [`MainGraph`].
///
/// Everything is considered unless hidden: nodes and edges created after the table was built
/// (for instance synthetic edges) take part in the layout without further bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct LayoutScratch {
    hidden_nodes: HashSet<NodeId>,
    hidden_edges: HashSet<EdgeId>,
    reversed: HashSet<EdgeId>,
    pinned: HashSet<NodeId>,
}

impl LayoutScratch {
    /// Starts from the graph's persistent exclusions.
    pub fn new(graph: &MainGraph) -> Self {
        let mut scratch = Self::default();
        scratch.reset(graph);
        scratch
    }

    /// Drops every per-run flag and re-applies the persistent exclusions.
    pub fn reset(&mut self, graph: &MainGraph) {
        self.hidden_nodes.clear();
        self.hidden_edges.clear();
        self.reversed.clear();
        self.pinned.clear();
        self.hidden_nodes.extend(
            graph
                .nodes()
                .filter(|n| !n.is_considered_in_layout())
                .map(Node::id),
        );
        self.hidden_edges.extend(
            graph
                .edges()
                .filter(|e| !e.is_considered_in_layout())
                .map(Edge::id),
        );
    }

    pub fn is_node_considered(&self, id: NodeId) -> bool {
        !self.hidden_nodes.contains(&id)
    }

    pub fn set_node_considered(&mut self, id: NodeId, considered: bool) {
        if considered {
            self.hidden_nodes.remove(&id);
        } else {
            self.hidden_nodes.insert(id);
        }
    }

    /// The edge's own flag, ignoring its endpoints.
    pub fn is_edge_marked(&self, id: EdgeId) -> bool {
        !self.hidden_edges.contains(&id)
    }

    /// An edge takes part in the layout when it is marked and both endpoints do.
    pub fn is_edge_considered(&self, graph: &MainGraph, id: EdgeId) -> bool {
        let Some(edge) = graph.edge(id) else {
            return false;
        };
        self.is_edge_marked(id)
            && self.is_node_considered(edge.source())
            && self.is_node_considered(edge.target())
    }

    pub fn set_edge_considered(&mut self, id: EdgeId, considered: bool) {
        if considered {
            self.hidden_edges.remove(&id);
        } else {
            self.hidden_edges.insert(id);
        }
    }

    pub fn is_reversed(&self, id: EdgeId) -> bool {
        self.reversed.contains(&id)
    }

    pub fn set_reversed(&mut self, id: EdgeId, reversed: bool) {
        if reversed {
            self.reversed.insert(id);
        } else {
            self.reversed.remove(&id);
        }
    }

    /// Source and target as the layout should see them.
    pub fn layout_endpoints(&self, edge: &Edge) -> (NodeId, NodeId) {
        if self.is_reversed(edge.id()) {
            (edge.target(), edge.source())
        } else {
            (edge.source(), edge.target())
        }
    }

    /// Anchors a node for the rest of the run without touching its geometry.
    pub fn pin(&mut self, id: NodeId) {
        self.pinned.insert(id);
    }

    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.pinned.contains(&id)
    }

    pub fn clear_pins(&mut self) {
        self.pinned.clear();
    }

    /// User anchor or run pin.
    pub fn is_anchored(&self, graph: &MainGraph, id: NodeId) -> bool {
        self.is_pinned(id) || graph.node(id).is_some_and(|n| n.geometry.anchored)
    }

    pub fn considered_nodes<'a>(&'a self, graph: &'a MainGraph) -> impl Iterator<Item = &'a Node> {
        graph.nodes().filter(|n| self.is_node_considered(n.id()))
    }

    pub fn considered_edges<'a>(&'a self, graph: &'a MainGraph) -> impl Iterator<Item = &'a Edge> {
        graph
            .edges()
            .filter(|e| self.is_edge_considered(graph, e.id()))
    }
}
