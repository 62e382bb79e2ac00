use super::anchor::find_reference;
use super::{EmittedEdge, EngineRequest, Manifest};
use crate::engine::{EngineEdge, EngineGraph, EngineNode, ROOT_ID};
use crate::error::{Error, Result};
use crate::options::{LayoutOptions, keys};
use crate::pipeline::{EngineAlgorithm, NodeScope};
use sirenia_graph::{EdgeId, GraphId, LayoutScratch, MainGraph, Node, NodeId, Point};

/// Serializes the part of `graph` that `request` covers.
///
/// Hidden nodes are omitted together with their content; reversed edges are emitted with their
/// endpoints swapped; edges leaving a subgraph are attached to the subgraph's container on the
/// level that owns them.
pub fn to_engine_graph(
    graph: &MainGraph,
    scratch: &LayoutScratch,
    request: &EngineRequest<'_>,
) -> Result<(EngineGraph, Manifest)> {
    let mut serializer = Serializer {
        graph,
        scratch,
        request,
        manifest: Manifest::default(),
    };
    let mut root = EngineNode {
        id: ROOT_ID.to_string(),
        label: ROOT_ID.to_string(),
        options: serializer.container_options(GraphId::ROOT),
        ..Default::default()
    };
    serializer.fill_level(&mut root, GraphId::ROOT, Point::ORIGIN)?;

    let mut manifest = serializer.manifest;
    manifest.reference = find_reference(graph, scratch, &manifest.nodes);
    Ok((EngineGraph::new(root), manifest))
}

struct Serializer<'a, 'r> {
    graph: &'a MainGraph,
    scratch: &'a LayoutScratch,
    request: &'a EngineRequest<'r>,
    manifest: Manifest,
}

impl Serializer<'_, '_> {
    fn is_targeted(&self, level: GraphId) -> bool {
        match self.request.scope {
            NodeScope::All | NodeScope::Profile => level.is_root(),
            NodeScope::Generalization => {
                let settled = !self.request.phase.is_pre_main()
                    && self.graph.graph(level).is_some_and(|g| g.is_laid_out());
                !level.is_root() && !settled
            }
        }
    }

    fn container_options(&mut self, level: GraphId) -> LayoutOptions {
        let mut options = self.request.node_defaults.clone();
        if self.is_targeted(level) {
            options.merge(&self.request.step_options);
            self.manifest.targeted.push(level);
        } else {
            options.set(keys::ALGORITHM, EngineAlgorithm::Fixed.id());
        }
        options
    }

    fn includes(&self, node: &Node) -> bool {
        if !self.scratch.is_node_considered(node.id()) {
            return false;
        }
        match self.request.scope {
            NodeScope::Profile => node.is_profile() || self.holds_profile(node),
            NodeScope::All | NodeScope::Generalization => true,
        }
    }

    /// Whether a container has a considered profile node anywhere below it.
    fn holds_profile(&self, node: &Node) -> bool {
        let Some(g) = node.subgraph().and_then(|inner| self.graph.graph(inner)) else {
            return false;
        };
        g.nodes()
            .filter(|&id| self.scratch.is_node_considered(id))
            .filter_map(|id| self.graph.node(id))
            .any(|child| child.is_profile() || self.holds_profile(child))
    }

    /// Emits the members and edges of `level` into `container`, whose absolute origin is `origin`.
    fn fill_level(
        &mut self,
        container: &mut EngineNode,
        level: GraphId,
        origin: Point,
    ) -> Result<()> {
        let graph = self.graph;
        let Some(g) = graph.graph(level) else {
            return Ok(());
        };
        for id in g.nodes() {
            let Some(node) = graph.node(id) else {
                continue;
            };
            if self.includes(node) {
                let child = self.node(node, origin)?;
                container.children.push(child);
            }
        }
        for id in g.edges() {
            if let Some(edge) = self.edge(id, level, origin)? {
                container.edges.push(edge);
            }
        }
        Ok(())
    }

    fn node(&mut self, node: &Node, origin: Point) -> Result<EngineNode> {
        let width = node.geometry.width.ok_or_else(|| Error::MissingDimension {
            node: node.key().to_string(),
            dimension: "width",
        })?;
        let height = node.geometry.height.ok_or_else(|| Error::MissingDimension {
            node: node.key().to_string(),
            dimension: "height",
        })?;

        let mut options = self.request.node_defaults.clone();
        if self.scratch.is_anchored(self.graph, node.id()) {
            options.set(keys::FIXED, true);
        }
        let label = if node.is_profile() {
            format!("<<profile>> {}", node.key())
        } else {
            node.key().to_string()
        };
        let local = node.geometry.position - origin;
        let mut out = EngineNode {
            id: node.key().to_string(),
            label,
            x: local.x,
            y: local.y,
            width,
            height,
            options,
            ..Default::default()
        };
        self.manifest.nodes.insert(node.id());

        if let Some(inner) = node.subgraph() {
            let container = self.container_options(inner);
            out.options.merge(&container);
            self.fill_level(&mut out, inner, node.geometry.position)?;
        }
        Ok(out)
    }

    fn edge(&mut self, id: EdgeId, level: GraphId, origin: Point) -> Result<Option<EngineEdge>> {
        let graph = self.graph;
        let Some(edge) = graph.edge(id) else {
            return Ok(None);
        };
        if !self.scratch.is_edge_considered(graph, id) {
            return Ok(None);
        }
        let (source, target) = self.scratch.layout_endpoints(edge);
        let outer_source = self.lift(source, level)?;
        let outer_target = self.lift(target, level)?;
        if outer_source == outer_target
            || !self.manifest.nodes.contains(&outer_source)
            || !self.manifest.nodes.contains(&outer_target)
        {
            return Ok(None);
        }

        let split = outer_source != source || outer_target != target;
        let engine_id = if split {
            format!("{}~split", edge.key())
        } else {
            edge.key().to_string()
        };
        let mut options = LayoutOptions::new();
        options.merge_map(&edge.options);
        let reversed = self.scratch.is_reversed(id);
        let mut bend_points: Vec<Point> = edge.waypoints.iter().map(|&p| p - origin).collect();
        if reversed {
            bend_points.reverse();
        }

        self.manifest
            .edges
            .insert(engine_id.clone(), EmittedEdge { edge: id, reversed });
        Ok(Some(EngineEdge {
            id: engine_id,
            source: self.key(outer_source),
            target: self.key(outer_target),
            options,
            bend_points,
        }))
    }

    /// The container of `node` on `level`, or `node` itself when it lives there.
    fn lift(&self, node: NodeId, level: GraphId) -> Result<NodeId> {
        self.graph
            .representative(node, level)
            .ok_or_else(|| Error::SubgraphNotFound { node: self.key(node) })
    }

    fn key(&self, node: NodeId) -> String {
        self.graph
            .node(node)
            .map(|n| n.key().to_string())
            .unwrap_or_default()
    }
}
