#![forbid(unsafe_code)]

//! Layout orchestration for class diagrams.
//!
//! `sirenia` does not place nodes itself. It turns a diagram and a user configuration into a
//! pipeline of engine calls and graph conversions, keeps anchored nodes where the user left
//! them, and scores candidate layouts to keep the best one. The placement itself is delegated to
//! a [`LayoutEngine`].

pub use sirenia_graph as graph;

pub mod adapters;
pub mod algo;
pub mod config;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod options;
pub mod pipeline;
mod select;
pub mod transform;

pub use config::{Direction, ForceModel, LayoutConfiguration, Strategy, StrategyConfig};
pub use diagram::{
    ClassEntity, Diagram, DiagramEdge, DiagramNode, DimensionEstimator, ExplicitAnchors,
    FixedDimensions, GeometryUpdate, RelationEntity, RelationKind, SemanticModel,
    build_main_graph,
};
pub use engine::{EngineEdge, EngineError, EngineGraph, EngineNode, LayoutEngine};
pub use error::{Error, Result};
pub use metrics::Score;
pub use options::LayoutOptions;
pub use pipeline::{ConstraintContainer, Phase};
pub use select::AUTOMATIC_CANDIDATES;

use pipeline::executor::{Executor, LayoutRun};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of one layout request.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub update: GeometryUpdate,
    pub score: Score,
    /// The strategy whose result was kept; differs from the configured one for automatic.
    pub strategy: Strategy,
    /// Whether any engine result was written.
    pub applied: bool,
}

/// Drives layout requests against one engine.
#[derive(Debug, Clone)]
pub struct Layouter<E, D> {
    engine: E,
    dimensions: D,
    node_defaults: LayoutOptions,
}

impl<E: LayoutEngine, D: DimensionEstimator> Layouter<E, D> {
    pub fn new(engine: E, dimensions: D) -> Self {
        Self {
            engine,
            dimensions,
            node_defaults: LayoutOptions::new(),
        }
    }

    /// Options attached to every node sent to the engine.
    pub fn with_node_defaults(mut self, node_defaults: LayoutOptions) -> Self {
        self.node_defaults = node_defaults;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub async fn layout(
        &self,
        diagram: &Diagram,
        model: &SemanticModel,
        config: &LayoutConfiguration,
        anchors: Option<&ExplicitAnchors>,
    ) -> Result<LayoutOutcome> {
        run_layout(
            &self.engine,
            &self.dimensions,
            &self.node_defaults,
            diagram,
            model,
            config,
            anchors,
        )
        .await
    }
}

/// One-shot layout without default node options.
pub async fn layout<E: LayoutEngine, D: DimensionEstimator>(
    engine: &E,
    dimensions: &D,
    diagram: &Diagram,
    model: &SemanticModel,
    config: &LayoutConfiguration,
    anchors: Option<&ExplicitAnchors>,
) -> Result<LayoutOutcome> {
    let node_defaults = LayoutOptions::new();
    run_layout(
        engine,
        dimensions,
        &node_defaults,
        diagram,
        model,
        config,
        anchors,
    )
    .await
}

async fn run_layout<E: LayoutEngine, D: DimensionEstimator>(
    engine: &E,
    dimensions: &D,
    node_defaults: &LayoutOptions,
    diagram: &Diagram,
    model: &SemanticModel,
    config: &LayoutConfiguration,
    anchors: Option<&ExplicitAnchors>,
) -> Result<LayoutOutcome> {
    config.validate()?;
    let anchors = anchors.cloned().unwrap_or_default();
    let original = build_main_graph(model, diagram, &anchors, dimensions)?;

    let mut container = ConstraintContainer::compile(config);
    let executor = Executor {
        engine,
        node_defaults,
    };
    let selection = select::run_container(
        &executor,
        LayoutRun::new(original.clone()),
        &mut container,
        &config.main,
    )
    .await?;

    let update = GeometryUpdate::between(&original, &selection.run.graph);
    tracing::info!(
        strategy = %selection.strategy,
        score = selection.score.total(),
        nodes = update.nodes.len(),
        edges = update.edges.len(),
        "layout finished"
    );
    Ok(LayoutOutcome {
        update,
        score: selection.score,
        strategy: selection.strategy,
        applied: selection.run.applied,
    })
}
