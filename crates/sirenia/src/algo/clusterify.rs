//! Decomposition of a graph level into edge-disjoint clusters.

use super::root::select_among;
use super::{RootSelection, level_edges, level_nodes};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use sirenia_graph::{EdgeId, GraphId, LayoutScratch, MainGraph, NodeId};
use std::collections::VecDeque;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Cluster root mapped to the edges of its cluster.
pub type Clusters = IndexMap<NodeId, Vec<EdgeId>>;

/// Groups the considered edges of `level` by connectivity.
///
/// Every node carrying at least one considered edge belongs to exactly one cluster; nodes
/// without edges belong to none. Each cluster is keyed by its most connected node and clusters
/// come out in the order their first node was inserted.
pub fn clusterify(graph: &MainGraph, scratch: &LayoutScratch, level: GraphId) -> Clusters {
    let nodes = level_nodes(graph, scratch, level);
    let edges = level_edges(graph, scratch, level);

    let mut adjacency: HashMap<NodeId, Vec<usize>> = HashMap::default();
    for (ix, e) in edges.iter().enumerate() {
        adjacency.entry(e.source).or_default().push(ix);
        adjacency.entry(e.target).or_default().push(ix);
    }

    let mut clusters = Clusters::new();
    let mut visited: HashSet<NodeId> = HashSet::default();
    for &start in &nodes {
        if visited.contains(&start) || !adjacency.contains_key(&start) {
            continue;
        }
        let mut members = Vec::new();
        let mut edge_ixs: IndexSet<usize> = IndexSet::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(u) = queue.pop_front() {
            members.push(u);
            for &ix in adjacency.get(&u).map(Vec::as_slice).unwrap_or(&[]) {
                edge_ixs.insert(ix);
                let e = edges[ix];
                let v = if e.source == u { e.target } else { e.source };
                if visited.insert(v) {
                    queue.push_back(v);
                }
            }
        }

        edge_ixs.sort_unstable();
        let component: Vec<_> = edge_ixs.iter().map(|&ix| edges[ix]).collect();
        members.sort_by_key(|m| nodes.iter().position(|n| n == m));
        let Some(root) = select_among(&members, &component, RootSelection::MostEdges) else {
            continue;
        };
        clusters.insert(root, component.iter().map(|e| e.id).collect());
    }

    tracing::debug!(clusters = clusters.len(), "clusterified graph level");
    clusters
}

/// Members of a cluster on `level`: the representatives of its edges' endpoints.
pub fn cluster_nodes(graph: &MainGraph, level: GraphId, edges: &[EdgeId]) -> IndexSet<NodeId> {
    let mut out = IndexSet::new();
    for &id in edges {
        let Some(edge) = graph.edge(id) else {
            continue;
        };
        for endpoint in [edge.source(), edge.target()] {
            if let Some(rep) = graph.representative(endpoint, level) {
                out.insert(rep);
            }
        }
    }
    out
}
