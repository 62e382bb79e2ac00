//! Node, edge and nested-graph records stored in the arena.

use super::{EdgeId, GraphId, NodeId};
use crate::geometry::{Geometry, Point};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub(in crate::graph) type HandleSet<T> = IndexSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Class,
    Profile,
    /// Container owning a nested [`Graph`].
    Subgraph,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(in crate::graph) id: NodeId,
    pub(in crate::graph) key: String,
    pub(in crate::graph) kind: NodeKind,
    pub(in crate::graph) parent: GraphId,
    pub(in crate::graph) subgraph: Option<GraphId>,
    pub(in crate::graph) excluded: bool,
    pub(in crate::graph) out_edges: Vec<EdgeId>,
    pub(in crate::graph) in_edges: Vec<EdgeId>,
    /// Semantic entity this node stands for. Containers created by the layout have none.
    pub entity: Option<String>,
    pub geometry: Geometry,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_profile(&self) -> bool {
        self.kind == NodeKind::Profile
    }

    pub fn is_subgraph(&self) -> bool {
        self.kind == NodeKind::Subgraph
    }

    /// The graph this node is a direct member of.
    pub fn parent(&self) -> GraphId {
        self.parent
    }

    /// The nested graph owned by this node, for subgraph containers.
    pub fn subgraph(&self) -> Option<GraphId> {
        self.subgraph
    }

    /// Persistent user exclusion. Per-run flags live in [`LayoutScratch`](crate::LayoutScratch).
    pub fn is_considered_in_layout(&self) -> bool {
        !self.excluded
    }

    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    pub fn degree(&self) -> usize {
        self.out_edges.len() + self.in_edges.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Relationship,
    Generalization,
    ProfileLink,
    /// Connectivity edge created while turning a forest into a single tree.
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub(in crate::graph) id: EdgeId,
    pub(in crate::graph) key: String,
    pub(in crate::graph) kind: EdgeKind,
    pub(in crate::graph) source: NodeId,
    pub(in crate::graph) target: NodeId,
    pub(in crate::graph) owner: GraphId,
    pub(in crate::graph) excluded: bool,
    pub entity: Option<String>,
    /// Per-edge layout option overrides.
    pub options: IndexMap<String, String>,
    /// Absolute bend points, set after layout.
    pub waypoints: Vec<Point>,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_synthetic(&self) -> bool {
        self.kind == EdgeKind::Synthetic
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Innermost graph containing both endpoints.
    pub fn owner(&self) -> GraphId {
        self.owner
    }

    pub fn is_considered_in_layout(&self) -> bool {
        !self.excluded
    }

    pub fn is_incident(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// The endpoint across from `node`, if `node` is an endpoint at all.
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

/// One nesting level: the root graph or the content of a subgraph container.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(in crate::graph) id: GraphId,
    pub(in crate::graph) owner: Option<NodeId>,
    pub(in crate::graph) nodes: HandleSet<NodeId>,
    pub(in crate::graph) edges: HandleSet<EdgeId>,
    pub(in crate::graph) laid_out: bool,
    pub(in crate::graph) detached: bool,
}

impl Graph {
    pub(in crate::graph) fn new(id: GraphId, owner: Option<NodeId>) -> Self {
        Self {
            id,
            owner,
            nodes: HandleSet::default(),
            edges: HandleSet::default(),
            laid_out: false,
            detached: false,
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Container node, `None` for the root graph.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether this level was already positioned during the current request.
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }
}
