use super::{HashMap, Manifest};
use crate::engine::{EngineError, EngineGraph, EngineNode};
use crate::error::Result;
use sirenia_graph::{EdgeId, MainGraph, NodeId, Point};

struct NodeUpdate {
    node: NodeId,
    position: Point,
    size: Option<(f64, f64)>,
}

#[derive(Default)]
struct Collected {
    nodes: Vec<NodeUpdate>,
    edges: Vec<(EdgeId, Vec<Point>)>,
    /// Absolute origin of every engine node holding edges.
    offsets: HashMap<String, Point>,
}

/// Writes an engine result back onto `graph`.
///
/// Engine coordinates are relative to the enclosing node; they are accumulated into absolute
/// positions. When the manifest names an anchor reference, the whole result is shifted so the
/// reference ends up where it was before the engine ran.
pub fn apply_engine_result(
    graph: &mut MainGraph,
    manifest: &Manifest,
    result: &EngineGraph,
) -> Result<()> {
    let mut collected = Collected::default();
    collected
        .offsets
        .insert(result.root.id.clone(), Point::ORIGIN);
    collect_nodes(graph, manifest, &result.root, Point::ORIGIN, &mut collected)?;
    collect_edges(manifest, result, &mut collected)?;

    let shift = manifest
        .reference()
        .and_then(|reference| {
            collected
                .nodes
                .iter()
                .find(|u| u.node == reference.node)
                .map(|u| u.position - reference.position)
        })
        .unwrap_or(Point::ORIGIN);
    if shift != Point::ORIGIN {
        tracing::debug!(dx = shift.x, dy = shift.y, "correcting engine drift");
    }

    for update in collected.nodes {
        let Some(node) = graph.node_mut(update.node) else {
            continue;
        };
        node.geometry.position = update.position - shift;
        if let Some((width, height)) = update.size {
            node.geometry.width = Some(width);
            node.geometry.height = Some(height);
        }
    }
    for (id, waypoints) in collected.edges {
        if let Some(edge) = graph.edge_mut(id) {
            edge.waypoints = waypoints.into_iter().map(|p| p - shift).collect();
        }
    }
    Ok(())
}

fn collect_nodes(
    graph: &MainGraph,
    manifest: &Manifest,
    parent: &EngineNode,
    offset: Point,
    out: &mut Collected,
) -> Result<()> {
    for child in &parent.children {
        let local = Point::new(child.x, child.y);
        if !local.is_finite() || !child.width.is_finite() || !child.height.is_finite() {
            return Err(malformed(format!("non-finite geometry on `{}`", child.id)).into());
        }
        let absolute = offset + local;
        out.offsets.insert(child.id.clone(), absolute);

        match graph
            .find_node(&child.id)
            .filter(|&id| manifest.is_emitted(id))
        {
            Some(id) => {
                let resized = graph
                    .node(id)
                    .and_then(|n| n.subgraph())
                    .is_some_and(|inner| manifest.targeted().contains(&inner));
                out.nodes.push(NodeUpdate {
                    node: id,
                    position: absolute,
                    size: resized.then_some((child.width, child.height)),
                });
            }
            None => tracing::warn!(id = %child.id, "ignoring unknown node in engine result"),
        }
        collect_nodes(graph, manifest, child, absolute, out)?;
    }
    Ok(())
}

fn collect_edges(manifest: &Manifest, result: &EngineGraph, out: &mut Collected) -> Result<()> {
    for (holder, edge) in result.edges() {
        let Some(emitted) = manifest.edges.get(&edge.id) else {
            tracing::warn!(id = %edge.id, "ignoring unknown edge in engine result");
            continue;
        };
        let offset = out.offsets.get(holder).copied().unwrap_or(Point::ORIGIN);
        if edge.bend_points.iter().any(|p| !p.is_finite()) {
            return Err(malformed(format!("non-finite bend point on `{}`", edge.id)).into());
        }
        let mut points: Vec<Point> = edge.bend_points.iter().map(|&p| offset + p).collect();
        if emitted.reversed {
            points.reverse();
        }
        out.edges.push((emitted.edge, points));
    }
    Ok(())
}

fn malformed(message: String) -> EngineError {
    EngineError::Malformed { message }
}
