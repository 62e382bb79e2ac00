//! Conversion between the [`MainGraph`] and the engine's nested graph format.
//!
//! One engine call is `serialize -> engine -> read back -> correct drift -> write`. The
//! serializer records a [`Manifest`] describing what it emitted so the result can be mapped back
//! onto the arena without guessing.

mod anchor;
mod deserialize;
mod serialize;

pub use deserialize::apply_engine_result;
pub use serialize::to_engine_graph;

use crate::engine::LayoutEngine;
use crate::error::Result;
use crate::options::LayoutOptions;
use crate::pipeline::{NodeScope, Phase};
use rustc_hash::FxBuildHasher;
use sirenia_graph::{EdgeId, GraphId, LayoutScratch, MainGraph, NodeId, Point};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// What a single engine call is asked to do.
#[derive(Debug, Clone)]
pub struct EngineRequest<'a> {
    pub phase: Phase,
    pub scope: NodeScope,
    /// Options of the executing step, attached to every container the step targets.
    pub step_options: LayoutOptions,
    /// Attached to every node.
    pub node_defaults: &'a LayoutOptions,
}

/// Anchored node used to undo the engine's global drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorReference {
    pub node: NodeId,
    /// Absolute position before the engine ran.
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmittedEdge {
    pub edge: EdgeId,
    pub reversed: bool,
}

/// Bookkeeping produced by [`to_engine_graph`].
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub(crate) nodes: HashSet<NodeId>,
    pub(crate) edges: HashMap<String, EmittedEdge>,
    pub(crate) targeted: Vec<GraphId>,
    pub(crate) reference: Option<AnchorReference>,
}

impl Manifest {
    pub fn reference(&self) -> Option<AnchorReference> {
        self.reference
    }

    pub fn is_emitted(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Graph levels laid out by the step rather than kept fixed.
    pub fn targeted(&self) -> &[GraphId] {
        &self.targeted
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Runs one engine call against `graph` and writes the result back.
///
/// Returns `Ok(false)` when nothing was written: either nothing was eligible for layout or the
/// engine produced no layout. Engine failures propagate.
pub async fn layout_with_engine<E: LayoutEngine>(
    engine: &E,
    graph: &mut MainGraph,
    scratch: &LayoutScratch,
    request: &EngineRequest<'_>,
) -> Result<bool> {
    let (engine_graph, manifest) = to_engine_graph(graph, scratch, request)?;
    if manifest.is_empty() {
        tracing::debug!(phase = ?request.phase, "nothing eligible for layout");
        return Ok(false);
    }

    let Some(result) = engine.layout(engine_graph).await? else {
        tracing::warn!(
            phase = ?request.phase,
            scope = ?request.scope,
            "layout engine produced no layout; graph left unchanged"
        );
        return Ok(false);
    };

    apply_engine_result(graph, &manifest, &result)?;
    if request.scope == NodeScope::Generalization {
        for &level in manifest.targeted() {
            if !level.is_root() {
                graph.set_laid_out(level, true)?;
            }
        }
    }
    Ok(true)
}
