//! The [`MainGraph`] arena.
//!
//! The root graph is the single source of truth for "all nodes" and "all edges": every element
//! reachable from a nested subgraph is also reachable through the flat key indices kept here.

mod entries;
mod handles;
mod subgraph;

pub use entries::{Edge, EdgeKind, Graph, Node, NodeKind};
pub use handles::{EdgeId, GraphId, NodeId};
pub use subgraph::SUBGRAPH_PADDING;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point};
use entries::HandleSet;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct MainGraph {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    // Graphs are never removed from the arena; a deleted container detaches its graph instead.
    graphs: Vec<Graph>,
    node_index: HashMap<String, NodeId>,
    edge_index: HashMap<String, EdgeId>,
    next_synthetic: usize,
}

impl Default for MainGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MainGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            graphs: vec![Graph::new(GraphId::ROOT, None)],
            node_index: HashMap::default(),
            edge_index: HashMap::default(),
            next_synthetic: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    pub fn root(&self) -> &Graph {
        &self.graphs[GraphId::ROOT.index()]
    }

    pub fn graph(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.get(id.index()).filter(|g| !g.detached)
    }

    /// Live graphs, root first.
    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.iter().filter(|g| !g.detached)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())?.as_ref()
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index())?.as_mut()
    }

    /// Looks a node up by key, at any nesting depth.
    pub fn find_node(&self, key: &str) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    /// Looks an edge up by key, at any nesting depth.
    pub fn find_edge(&self, key: &str) -> Option<EdgeId> {
        self.edge_index.get(key).copied()
    }

    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.node(self.find_node(key)?)
    }

    pub fn edge_by_key(&self, key: &str) -> Option<&Edge> {
        self.edge(self.find_edge(key)?)
    }

    /// All live nodes in insertion order, regardless of nesting.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// All live edges in insertion order, regardless of nesting.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges().map(|e| e.id).collect()
    }

    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        self.node(id).map(|n| n.out_edges.as_slice()).unwrap_or(&[])
    }

    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        self.node(id).map(|n| n.in_edges.as_slice()).unwrap_or(&[])
    }

    /// Outgoing edges first, then incoming ones.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(id)
            .iter()
            .chain(self.in_edges(id))
            .copied()
    }

    pub fn add_node(
        &mut self,
        graph: GraphId,
        key: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId> {
        let key = key.into();
        if self.graph(graph).is_none() {
            return Err(Error::MissingGraph { id: graph });
        }
        if self.node_index.contains_key(&key) {
            return Err(Error::DuplicateNode { key });
        }

        let id = NodeId::from_index(self.nodes.len());
        let subgraph = if kind == NodeKind::Subgraph {
            let gid = GraphId::from_index(self.graphs.len());
            self.graphs.push(Graph::new(gid, Some(id)));
            Some(gid)
        } else {
            None
        };

        self.nodes.push(Some(Node {
            id,
            key: key.clone(),
            kind,
            parent: graph,
            subgraph,
            excluded: false,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            entity: None,
            geometry: Geometry::default(),
        }));
        self.node_index.insert(key, id);
        self.graphs[graph.index()].nodes.insert(id);
        Ok(id)
    }

    pub fn add_edge(
        &mut self,
        key: impl Into<String>,
        kind: EdgeKind,
        source: NodeId,
        target: NodeId,
    ) -> Result<EdgeId> {
        let key = key.into();
        if self.node(source).is_none() {
            return Err(Error::MissingNode { id: source });
        }
        if self.node(target).is_none() {
            return Err(Error::MissingNode { id: target });
        }
        if self.edge_index.contains_key(&key) {
            return Err(Error::DuplicateEdge { key });
        }

        let id = EdgeId::from_index(self.edges.len());
        let owner = self.common_graph(source, target);
        self.edges.push(Some(Edge {
            id,
            key: key.clone(),
            kind,
            source,
            target,
            owner,
            excluded: false,
            entity: None,
            options: IndexMap::new(),
            waypoints: Vec::new(),
        }));
        self.edge_index.insert(key, id);
        self.graphs[owner.index()].edges.insert(id);
        if let Some(n) = self.node_mut(source) {
            n.out_edges.push(id);
        }
        if let Some(n) = self.node_mut(target) {
            n.in_edges.push(id);
        }
        Ok(id)
    }

    /// Adds a connectivity edge with a generated key.
    pub fn add_synthetic_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId> {
        let mut key = format!("synthetic:{}", self.next_synthetic);
        while self.edge_index.contains_key(&key) {
            self.next_synthetic += 1;
            key = format!("synthetic:{}", self.next_synthetic);
        }
        self.next_synthetic += 1;
        self.add_edge(key, EdgeKind::Synthetic, source, target)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.get_mut(id.index()).and_then(Option::take) else {
            return false;
        };
        self.edge_index.remove(&edge.key);
        self.graphs[edge.owner.index()].edges.shift_remove(&id);
        if let Some(n) = self.node_mut(edge.source) {
            n.out_edges.retain(|e| *e != id);
        }
        if let Some(n) = self.node_mut(edge.target) {
            n.in_edges.retain(|e| *e != id);
        }
        true
    }

    /// Removes a node with its incident edges. Removing a container removes its content too.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let incident: Vec<EdgeId> = self.incident_edges(id).collect();
        let parent = node.parent;
        let subgraph = node.subgraph;

        if let Some(gid) = subgraph {
            let children: Vec<NodeId> = self.graphs[gid.index()].nodes().collect();
            for child in children {
                self.remove_node(child);
            }
            let g = &mut self.graphs[gid.index()];
            g.detached = true;
            g.edges.clear();
        }
        for e in incident {
            self.remove_edge(e);
        }

        if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
            self.node_index.remove(&node.key);
        }
        self.graphs[parent.index()].nodes.shift_remove(&id);
        true
    }

    /// Marks a node as excluded from layout without deleting it.
    pub fn exclude_node(&mut self, id: NodeId) -> Result<()> {
        self.set_node_excluded(id, true)
    }

    pub fn include_node(&mut self, id: NodeId) -> Result<()> {
        self.set_node_excluded(id, false)
    }

    fn set_node_excluded(&mut self, id: NodeId, excluded: bool) -> Result<()> {
        let node = self.node_mut(id).ok_or(Error::MissingNode { id })?;
        node.excluded = excluded;
        Ok(())
    }

    pub fn exclude_edge(&mut self, id: EdgeId) -> Result<()> {
        let edge = self.edge_mut(id).ok_or(Error::MissingEdge { id })?;
        edge.excluded = true;
        Ok(())
    }

    /// The graph enclosing `graph`, i.e. the parent of its container.
    pub fn parent_graph(&self, graph: GraphId) -> Option<GraphId> {
        let owner = self.graph(graph)?.owner?;
        Some(self.node(owner)?.parent)
    }

    /// Graphs enclosing `node`, innermost first, ending with the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<GraphId> {
        let mut out = Vec::new();
        let Some(n) = self.node(node) else {
            return out;
        };
        let mut current = Some(n.parent);
        while let Some(g) = current {
            out.push(g);
            current = self.parent_graph(g);
        }
        out
    }

    /// Whether `node` is a member of `graph` or of any subgraph nested below it.
    pub fn is_within(&self, node: NodeId, graph: GraphId) -> bool {
        self.ancestors(node).contains(&graph)
    }

    /// The ancestor-or-self of `node` that is a direct member of `level`.
    pub fn representative(&self, node: NodeId, level: GraphId) -> Option<NodeId> {
        let mut current = self.node(node)?;
        loop {
            if current.parent == level {
                return Some(current.id);
            }
            let owner = self.graph(current.parent)?.owner?;
            current = self.node(owner)?;
        }
    }

    /// Innermost graph containing both nodes.
    pub fn common_graph(&self, a: NodeId, b: NodeId) -> GraphId {
        let a_chain = self.ancestors(a);
        self.ancestors(b)
            .into_iter()
            .find(|g| a_chain.contains(g))
            .unwrap_or(GraphId::ROOT)
    }

    pub fn center(&self, id: NodeId) -> Option<Point> {
        Some(self.node(id)?.geometry.center())
    }

    /// Moves a node by `delta`; containers carry their content and internal waypoints along.
    pub fn translate_node(&mut self, id: NodeId, delta: Point) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.geometry.position += delta;
        let Some(gid) = node.subgraph else {
            return;
        };
        let children: Vec<NodeId> = self.graphs[gid.index()].nodes().collect();
        let edges: Vec<EdgeId> = self.graphs[gid.index()].edges().collect();
        for child in children {
            self.translate_node(child, delta);
        }
        for e in edges {
            self.translate_edge(e, delta);
        }
    }

    pub fn translate_edge(&mut self, id: EdgeId, delta: Point) {
        if let Some(edge) = self.edge_mut(id) {
            for p in &mut edge.waypoints {
                *p += delta;
            }
        }
    }

    pub fn set_laid_out(&mut self, graph: GraphId, laid_out: bool) -> Result<()> {
        let g = self
            .graphs
            .get_mut(graph.index())
            .filter(|g| !g.detached)
            .ok_or(Error::MissingGraph { id: graph })?;
        g.laid_out = laid_out;
        Ok(())
    }

    /// Removes every synthetic edge; returns how many were removed.
    pub fn remove_synthetic_edges(&mut self) -> usize {
        let synthetic: Vec<EdgeId> = self
            .edges()
            .filter(|e| e.is_synthetic())
            .map(|e| e.id)
            .collect();
        for &e in &synthetic {
            self.remove_edge(e);
        }
        synthetic.len()
    }

    /// Clears transient run state so the graph can be laid out again.
    ///
    /// Positions and waypoints are kept; synthetic edges and "laid out" marks are dropped.
    pub fn reset_for_new_layout(&mut self) {
        self.remove_synthetic_edges();
        for g in &mut self.graphs {
            g.laid_out = false;
        }
    }

    fn move_node_to(&mut self, id: NodeId, to: GraphId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let from = node.parent;
        node.parent = to;
        self.graphs[from.index()].nodes.shift_remove(&id);
        self.graphs[to.index()].nodes.insert(id);
    }

    /// Recomputes edge owners for the edges of `graph` after membership changed.
    fn rehome_edges(&mut self, graph: GraphId) {
        let edges: HandleSet<EdgeId> = self.graphs[graph.index()].edges.clone();
        for id in edges {
            let Some(edge) = self.edge(id) else {
                continue;
            };
            let owner = self.common_graph(edge.source, edge.target);
            if owner == graph {
                continue;
            }
            self.graphs[graph.index()].edges.shift_remove(&id);
            self.graphs[owner.index()].edges.insert(id);
            if let Some(edge) = self.edge_mut(id) {
                edge.owner = owner;
            }
        }
    }
}
