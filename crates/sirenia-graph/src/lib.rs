#![forbid(unsafe_code)]

//! Graph model used by `sirenia`.
//!
//! A [`MainGraph`] is an arena that owns every node, edge and nested graph of a diagram. Nodes
//! and edges are addressed by small integer handles, and the arena keeps flat key indices so
//! that any element can be found regardless of how deeply it is nested.
//!
//! Per-run layout flags (considered / reversed / pinned) do not live on the entities; they are
//! kept in a separate [`LayoutScratch`] side table so that a graph can be cloned and re-laid
//! out without leaking state between runs.

pub mod error;
pub mod geometry;
pub mod graph;
pub mod scratch;

pub use error::{Error, Result};
pub use geometry::{Bounds, Geometry, Point};
pub use graph::{
    Edge, EdgeId, EdgeKind, Graph, GraphId, MainGraph, Node, NodeId, NodeKind, SUBGRAPH_PADDING,
};
pub use scratch::LayoutScratch;
