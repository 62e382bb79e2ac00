//! Turning an arbitrary (possibly cyclic, possibly disconnected) graph into a single tree.
//!
//! A breadth-first traversal from the selected root keeps exactly one edge per reached node and
//! orients it away from the root. Components the traversal cannot reach are hooked below the
//! deepest node found so far through a synthetic edge, so the result is always one tree.

use super::root::select_among;
use super::{LevelEdge, RootSelection, level_edges, level_nodes};
use crate::error::Result;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use sirenia_graph::{EdgeId, GraphId, LayoutScratch, MainGraph, NodeId};
use std::collections::VecDeque;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Treeified {
    pub root: Option<NodeId>,
    /// Depth of every node of the level, in discovery order.
    pub levels: IndexMap<NodeId, usize>,
    pub synthetic_edges: Vec<EdgeId>,
}

impl Treeified {
    pub fn depth(&self) -> usize {
        self.levels.values().copied().max().unwrap_or(0)
    }
}

/// Rewrites the scratch flags of `level` so that its considered edges form one tree.
///
/// Traversed edges are marked considered and reversed where needed so that they point toward
/// increasing depth; every other edge of the level is hidden. Synthetic edges are added to the
/// graph itself.
pub fn treeify(
    graph: &mut MainGraph,
    scratch: &mut LayoutScratch,
    level: GraphId,
) -> Result<Treeified> {
    let nodes = level_nodes(graph, scratch, level);
    let edges = level_edges(graph, scratch, level);

    // Self-loops on a member would survive `level_edges`; hide them along with every other edge
    // owned by the level. Edges inside nested subgraphs keep their flags.
    let hidden: Vec<EdgeId> = scratch
        .considered_edges(graph)
        .filter(|e| e.owner() == level)
        .map(|e| e.id())
        .collect();
    for id in hidden {
        scratch.set_edge_considered(id, false);
    }

    let mut adjacency: HashMap<NodeId, Vec<usize>> = HashMap::default();
    for (ix, e) in edges.iter().enumerate() {
        adjacency.entry(e.source).or_default().push(ix);
        adjacency.entry(e.target).or_default().push(ix);
    }

    let mut out = Treeified::default();
    let Some(root) = select_among(&nodes, &edges, RootSelection::MostEdges) else {
        return Ok(out);
    };
    out.root = Some(root);
    out.levels.insert(root, 0);
    traverse(root, &edges, &adjacency, scratch, &mut out.levels);

    while let Some(unreached) = nodes
        .iter()
        .copied()
        .find(|n| !out.levels.contains_key(n))
    {
        let mut deepest = (root, 0usize);
        for (&node, &depth) in &out.levels {
            if depth > deepest.1 {
                deepest = (node, depth);
            }
        }
        let synthetic = graph.add_synthetic_edge(deepest.0, unreached)?;
        scratch.set_edge_considered(synthetic, true);
        out.synthetic_edges.push(synthetic);
        out.levels.insert(unreached, deepest.1 + 1);
        traverse(unreached, &edges, &adjacency, scratch, &mut out.levels);
    }

    tracing::debug!(
        nodes = out.levels.len(),
        synthetic = out.synthetic_edges.len(),
        depth = out.depth(),
        "treeified graph level"
    );
    Ok(out)
}

fn traverse(
    start: NodeId,
    edges: &[LevelEdge],
    adjacency: &HashMap<NodeId, Vec<usize>>,
    scratch: &mut LayoutScratch,
    levels: &mut IndexMap<NodeId, usize>,
) {
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        let depth = levels.get(&u).copied().unwrap_or(0);
        let Some(incident) = adjacency.get(&u) else {
            continue;
        };
        for &ix in incident {
            let e = edges[ix];
            let v = if e.source == u { e.target } else { e.source };
            if levels.contains_key(&v) {
                continue;
            }
            levels.insert(v, depth + 1);
            scratch.set_edge_considered(e.id, true);
            scratch.set_reversed(e.id, e.source != u);
            queue.push_back(v);
        }
    }
}
