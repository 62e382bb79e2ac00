//! Interface to the external constraint-based layout engine.
//!
//! The engine is a black box: it receives a nested graph description where every node carries
//! its size, its current parent-relative position and a set of [`LayoutOptions`], and answers
//! with the same tree carrying new positions and edge bend points.

use crate::options::LayoutOptions;
use serde::{Deserialize, Serialize};
use sirenia_graph::Point;
use std::future::Future;

/// Id of the synthetic container wrapping a whole serialized graph.
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineGraph {
    pub root: EngineNode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Relative to the enclosing node.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub options: LayoutOptions,
    #[serde(default)]
    pub children: Vec<EngineNode>,
    /// Edges whose bend points are expressed relative to this node.
    #[serde(default)]
    pub edges: Vec<EngineEdge>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub options: LayoutOptions,
    #[serde(default)]
    pub bend_points: Vec<Point>,
}

impl EngineGraph {
    pub fn new(root: EngineNode) -> Self {
        Self { root }
    }

    pub fn find_node(&self, id: &str) -> Option<&EngineNode> {
        self.root.find(id)
    }

    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut EngineNode> {
        self.root.find_mut(id)
    }

    /// Every node below the root, depth first.
    pub fn nodes(&self) -> Vec<&EngineNode> {
        let mut out = Vec::new();
        self.root.collect_descendants(&mut out);
        out
    }

    /// Every edge in the tree, together with the id of the node that holds it.
    pub fn edges(&self) -> Vec<(&str, &EngineEdge)> {
        let mut out = Vec::new();
        self.root.collect_edges(&mut out);
        out
    }

    pub fn find_edge_mut(&mut self, id: &str) -> Option<&mut EngineEdge> {
        self.root.find_edge_mut(id)
    }

    /// The algorithm requested on the root container.
    pub fn algorithm(&self) -> Option<&str> {
        self.root.options.get(crate::options::keys::ALGORITHM)
    }
}

impl EngineNode {
    pub fn find(&self, id: &str) -> Option<&EngineNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut EngineNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn find_edge_mut(&mut self, id: &str) -> Option<&mut EngineEdge> {
        if let Some(pos) = self.edges.iter().position(|e| e.id == id) {
            return self.edges.get_mut(pos);
        }
        self.children.iter_mut().find_map(|c| c.find_edge_mut(id))
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a EngineNode>) {
        for c in &self.children {
            out.push(c);
            c.collect_descendants(out);
        }
    }

    fn collect_edges<'a>(&'a self, out: &mut Vec<(&'a str, &'a EngineEdge)>) {
        for e in &self.edges {
            out.push((self.id.as_str(), e));
        }
        for c in &self.children {
            c.collect_edges(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("layout engine failed: {message}")]
    Failed { message: String },
    #[error("layout engine timed out")]
    TimedOut,
    #[error("layout engine returned a malformed result: {message}")]
    Malformed { message: String },
}

impl EngineError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// A constraint-based layout engine.
///
/// `Ok(None)` means the engine produced no layout; callers leave the graph untouched. Timeouts
/// are the engine's business and surface as [`EngineError::TimedOut`].
pub trait LayoutEngine {
    fn layout(
        &self,
        graph: EngineGraph,
    ) -> impl Future<Output = Result<Option<EngineGraph>, EngineError>>;
}

impl<T: LayoutEngine> LayoutEngine for &T {
    fn layout(
        &self,
        graph: EngineGraph,
    ) -> impl Future<Output = Result<Option<EngineGraph>, EngineError>> {
        (**self).layout(graph)
    }
}
