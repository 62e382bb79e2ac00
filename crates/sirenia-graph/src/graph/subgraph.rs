//! Subgraph creation and generalization grouping.

use super::{EdgeKind, GraphId, MainGraph, NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::geometry::Bounds;
use indexmap::IndexMap;

/// Margin between a container's border and its content.
pub const SUBGRAPH_PADDING: f64 = 20.0;

impl MainGraph {
    /// Creates a container in `parent` and moves `members` into its nested graph.
    ///
    /// Edges whose endpoints both end up inside the new graph are re-homed there; edges that
    /// cross the container boundary stay with their outer owner.
    pub fn create_subgraph(
        &mut self,
        parent: GraphId,
        key: impl Into<String>,
        members: &[NodeId],
    ) -> Result<NodeId> {
        if self.graph(parent).is_none() {
            return Err(Error::MissingGraph { id: parent });
        }
        for &m in members {
            let node = self.node(m).ok_or(Error::MissingNode { id: m })?;
            if node.parent != parent {
                return Err(Error::NotAMember {
                    key: node.key.clone(),
                    graph: parent,
                });
            }
        }

        let container = self.add_node(parent, key, NodeKind::Subgraph)?;
        let Some(inner) = self.node(container).and_then(|n| n.subgraph) else {
            return Err(Error::MissingNode { id: container });
        };
        for &m in members {
            self.move_node_to(m, inner);
        }
        self.rehome_edges(parent);
        self.fit_subgraph(inner);
        Ok(container)
    }

    /// Resizes a container so that it encloses its members plus [`SUBGRAPH_PADDING`].
    ///
    /// Members without dimensions are ignored; an empty container keeps its geometry.
    pub fn fit_subgraph(&mut self, graph: GraphId) {
        let Some(g) = self.graph(graph) else {
            return;
        };
        let Some(owner) = g.owner else {
            return;
        };
        let bounds = g
            .nodes()
            .filter_map(|id| self.node(id)?.geometry.bounds())
            .reduce(|a, b| a.union(&b));
        let Some(bounds) = bounds else {
            return;
        };
        let Bounds {
            x,
            y,
            width,
            height,
        } = bounds.inflate(SUBGRAPH_PADDING);
        if let Some(node) = self.node_mut(owner) {
            node.geometry.position.x = x;
            node.geometry.position.y = y;
            node.geometry.width = Some(width);
            node.geometry.height = Some(height);
        }
    }

    /// Groups root-level nodes connected only through generalization edges into subgraphs.
    ///
    /// Only considered class/profile nodes take part; singleton groups stay where they are.
    /// Returns the created containers in discovery order.
    pub fn create_generalization_subgraphs(&mut self) -> Result<Vec<NodeId>> {
        let candidates: Vec<NodeId> = self
            .root()
            .nodes()
            .filter(|&id| {
                self.node(id)
                    .is_some_and(|n| !n.is_subgraph() && n.is_considered_in_layout())
            })
            .collect();
        let slot: IndexMap<NodeId, usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut sets = DisjointSet::new(candidates.len());
        for eid in self.root().edges() {
            let Some(edge) = self.edge(eid) else {
                continue;
            };
            if edge.kind != EdgeKind::Generalization || edge.excluded {
                continue;
            }
            if let (Some(&a), Some(&b)) = (slot.get(&edge.source), slot.get(&edge.target)) {
                sets.union(a, b);
            }
        }

        let mut groups: IndexMap<usize, Vec<NodeId>> = IndexMap::new();
        for (i, &id) in candidates.iter().enumerate() {
            groups.entry(sets.find(i)).or_default().push(id);
        }

        let mut created = Vec::new();
        let mut seq = 0usize;
        for members in groups.into_values().filter(|m| m.len() > 1) {
            let mut key = format!("generalization:{seq}");
            while self.find_node(&key).is_some() {
                seq += 1;
                key = format!("generalization:{seq}");
            }
            seq += 1;
            created.push(self.create_subgraph(GraphId::ROOT, key, &members)?);
        }
        Ok(created)
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
