//! Inbound semantic entities and existing diagrams, and the outbound geometry update.

use crate::error::Result;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use sirenia_graph::{EdgeKind, Geometry, GraphId, MainGraph, NodeKind, Point};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticModel {
    #[serde(default)]
    pub classes: Vec<ClassEntity>,
    #[serde(default)]
    pub relations: Vec<RelationEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: bool,
}

impl ClassEntity {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            profile: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Relationship,
    Generalization,
    ProfileLink,
}

impl From<RelationKind> for EdgeKind {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Relationship => EdgeKind::Relationship,
            RelationKind::Generalization => EdgeKind::Generalization,
            RelationKind::ProfileLink => EdgeKind::ProfileLink,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEntity {
    pub id: String,
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
    /// Layout option overrides for this relation's edge.
    #[serde(default)]
    pub options: IndexMap<String, String>,
}

impl RelationEntity {
    pub fn new(
        id: impl Into<String>,
        kind: RelationKind,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            target: target.into(),
            options: IndexMap::new(),
        }
    }
}

/// The diagram as the editor currently shows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub nodes: Vec<DiagramNode>,
    #[serde(default)]
    pub edges: Vec<DiagramEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub entity: String,
    pub position: Point,
    #[serde(default)]
    pub anchored: bool,
    /// Kept in the diagram but left out of the layout.
    #[serde(default)]
    pub excluded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub entity: String,
    #[serde(default)]
    pub waypoints: Vec<Point>,
}

/// Which nodes count as anchored for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "nodes", rename_all = "camelCase")]
pub enum ExplicitAnchors {
    /// Anchors stored in the diagram.
    #[default]
    Existing,
    /// Diagram anchors plus the listed entities.
    Merge(Vec<String>),
    /// Only the listed entities.
    Only(Vec<String>),
    /// Everything except the listed entities.
    AllExcept(Vec<String>),
}

/// Estimates the size a class will be rendered at.
pub trait DimensionEstimator {
    fn width(&self, class: &ClassEntity) -> f64;
    fn height(&self, class: &ClassEntity) -> f64;
}

impl<F> DimensionEstimator for F
where
    F: Fn(&ClassEntity) -> (f64, f64),
{
    fn width(&self, class: &ClassEntity) -> f64 {
        self(class).0
    }

    fn height(&self, class: &ClassEntity) -> f64 {
        self(class).1
    }
}

/// Every class gets the same box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDimensions {
    pub width: f64,
    pub height: f64,
}

impl DimensionEstimator for FixedDimensions {
    fn width(&self, _class: &ClassEntity) -> f64 {
        self.width
    }

    fn height(&self, _class: &ClassEntity) -> f64 {
        self.height
    }
}

/// Builds the arena for one request.
///
/// Classes missing from the diagram start at the origin, unanchored. Relations referencing an
/// unknown class are a structural error.
pub fn build_main_graph<D: DimensionEstimator + ?Sized>(
    model: &SemanticModel,
    diagram: &Diagram,
    anchors: &ExplicitAnchors,
    dimensions: &D,
) -> Result<MainGraph> {
    let placed: IndexMap<&str, &DiagramNode> = diagram
        .nodes
        .iter()
        .map(|n| (n.entity.as_str(), n))
        .collect();
    let routed: IndexMap<&str, &DiagramEdge> = diagram
        .edges
        .iter()
        .map(|e| (e.entity.as_str(), e))
        .collect();

    let mut graph = MainGraph::new();
    for class in &model.classes {
        let kind = if class.profile {
            NodeKind::Profile
        } else {
            NodeKind::Class
        };
        let id = graph.add_node(GraphId::ROOT, class.id.clone(), kind)?;
        let seeded = placed.get(class.id.as_str());
        let position = seeded.map(|n| n.position).unwrap_or_default();
        let anchored = seeded.is_some_and(|n| n.anchored);
        if let Some(node) = graph.node_mut(id) {
            node.entity = Some(class.id.clone());
            node.geometry = Geometry {
                position,
                anchored,
                ..Default::default()
            }
            .with_size(dimensions.width(class), dimensions.height(class));
        }
        if seeded.is_some_and(|n| n.excluded) {
            graph.exclude_node(id)?;
        }
    }

    for relation in &model.relations {
        let source = graph.find_node(&relation.source).ok_or_else(|| {
            sirenia_graph::Error::UnknownNode {
                key: relation.source.clone(),
            }
        })?;
        let target = graph.find_node(&relation.target).ok_or_else(|| {
            sirenia_graph::Error::UnknownNode {
                key: relation.target.clone(),
            }
        })?;
        let id = graph.add_edge(relation.id.clone(), relation.kind.into(), source, target)?;
        if let Some(edge) = graph.edge_mut(id) {
            edge.entity = Some(relation.id.clone());
            edge.options = relation.options.clone();
            if let Some(seeded) = routed.get(relation.id.as_str()) {
                edge.waypoints = seeded.waypoints.clone();
            }
        }
    }

    apply_anchors(&mut graph, anchors);
    Ok(graph)
}

fn apply_anchors(graph: &mut MainGraph, anchors: &ExplicitAnchors) {
    let listed: IndexSet<&str> = match anchors {
        ExplicitAnchors::Existing => return,
        ExplicitAnchors::Merge(ids)
        | ExplicitAnchors::Only(ids)
        | ExplicitAnchors::AllExcept(ids) => ids.iter().map(String::as_str).collect(),
    };
    for key in &listed {
        if graph.find_node(key).is_none() {
            tracing::warn!(entity = *key, "explicit anchor names an unknown entity");
        }
    }

    for id in graph.node_ids() {
        let Some(node) = graph.node_mut(id) else {
            continue;
        };
        let is_listed = node.entity.as_deref().is_some_and(|e| listed.contains(e));
        node.geometry.anchored = match anchors {
            ExplicitAnchors::Existing => node.geometry.anchored,
            ExplicitAnchors::Merge(_) => node.geometry.anchored || is_listed,
            ExplicitAnchors::Only(_) => is_listed,
            ExplicitAnchors::AllExcept(_) => !is_listed,
        };
    }
}

/// Entity-keyed positions and routes that changed during a request.
///
/// Elements the run did not touch are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryUpdate {
    pub nodes: IndexMap<String, Point>,
    pub edges: IndexMap<String, Vec<Point>>,
}

impl GeometryUpdate {
    pub fn between(before: &MainGraph, after: &MainGraph) -> Self {
        let mut update = GeometryUpdate::default();
        for node in after.nodes() {
            let Some(entity) = node.entity.as_deref() else {
                continue;
            };
            let moved = before
                .node_by_key(node.key())
                .is_none_or(|old| old.geometry.position != node.geometry.position);
            if moved {
                update
                    .nodes
                    .insert(entity.to_string(), node.geometry.position);
            }
        }
        for edge in after.edges() {
            let Some(entity) = edge.entity.as_deref() else {
                continue;
            };
            let rerouted = before
                .edge_by_key(edge.key())
                .is_none_or(|old| old.waypoints != edge.waypoints);
            if rerouted {
                update
                    .edges
                    .insert(entity.to_string(), edge.waypoints.clone());
            }
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
