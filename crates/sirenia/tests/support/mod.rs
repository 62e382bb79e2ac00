#![allow(dead_code)]

use sirenia::graph::Point;
use sirenia::options::keys;
use sirenia::{
    ClassEntity, Diagram, DiagramNode, EngineError, EngineGraph, EngineNode, FixedDimensions,
    LayoutEngine, RelationEntity, RelationKind, SemanticModel,
};
use std::cell::RefCell;

pub const DIMS: FixedDimensions = FixedDimensions {
    width: 40.0,
    height: 20.0,
};

/// Engine double: applies a script to every request and records what it was sent.
pub struct ScriptedEngine<F> {
    script: F,
    calls: RefCell<Vec<EngineGraph>>,
}

impl<F> ScriptedEngine<F>
where
    F: Fn(EngineGraph) -> Result<Option<EngineGraph>, EngineError>,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EngineGraph> {
        self.calls.borrow().clone()
    }

    pub fn algorithms(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|g| g.algorithm().unwrap_or_default().to_string())
            .collect()
    }
}

impl<F> LayoutEngine for ScriptedEngine<F>
where
    F: Fn(EngineGraph) -> Result<Option<EngineGraph>, EngineError>,
{
    async fn layout(&self, graph: EngineGraph) -> Result<Option<EngineGraph>, EngineError> {
        self.calls.borrow_mut().push(graph.clone());
        (self.script)(graph)
    }
}

/// Returns every request unchanged.
pub fn identity(graph: EngineGraph) -> Result<Option<EngineGraph>, EngineError> {
    Ok(Some(graph))
}

/// Moves the named nodes to the given parent-relative coordinates.
pub fn move_to(
    moves: &'static [(&'static str, f64, f64)],
) -> impl Fn(EngineGraph) -> Result<Option<EngineGraph>, EngineError> {
    move |mut graph| {
        for &(id, x, y) in moves {
            if let Some(node) = graph.find_node_mut(id) {
                node.x = x;
                node.y = y;
            }
        }
        Ok(Some(graph))
    }
}

fn is_fixed(node: &EngineNode) -> bool {
    node.options.get(keys::FIXED) == Some("true")
}

/// A crude engine that reacts to the requested algorithm on the root container.
///
/// - `stress`, `force`: piles every free node onto the origin (a terrible layout);
/// - `radial`, `layered`: spreads free nodes on a circle in child order;
/// - anything else: leaves positions alone.
pub fn geometric(mut graph: EngineGraph) -> Result<Option<EngineGraph>, EngineError> {
    let algorithm = graph.algorithm().unwrap_or_default().to_string();
    let count = graph.root.children.len().max(1) as f64;
    for (ix, node) in graph.root.children.iter_mut().enumerate() {
        if is_fixed(node) {
            continue;
        }
        match algorithm.as_str() {
            "stress" | "force" => {
                node.x = 0.0;
                node.y = 0.0;
            }
            "radial" | "layered" => {
                let angle = ix as f64 / count * std::f64::consts::TAU;
                node.x = 500.0 * angle.cos();
                node.y = 500.0 * angle.sin();
            }
            _ => {}
        }
    }
    Ok(Some(graph))
}

pub fn model(classes: &[&str], relations: &[(&str, RelationKind, &str, &str)]) -> SemanticModel {
    SemanticModel {
        classes: classes.iter().map(|&id| ClassEntity::new(id)).collect(),
        relations: relations
            .iter()
            .map(|&(id, kind, s, t)| RelationEntity::new(id, kind, s, t))
            .collect(),
    }
}

pub fn diagram(nodes: &[(&str, f64, f64, bool)]) -> Diagram {
    Diagram {
        nodes: nodes
            .iter()
            .map(|&(entity, x, y, anchored)| DiagramNode {
                entity: entity.to_string(),
                position: Point::new(x, y),
                anchored,
                excluded: false,
            })
            .collect(),
        edges: Vec::new(),
    }
}
