//! Layout pipelines: what runs, in which order, and how often.
//!
//! A [`ConstraintContainer`] is compiled once per request from a [`LayoutConfiguration`]. It
//! holds three ordered action lists: pre-main actions run once, main actions run once per
//! requested run (the best-scoring run wins), and post-main actions run once on the winner.

mod compile;
pub(crate) mod executor;

use crate::algo::{Clusters, Treeified};
use crate::config::{Direction, ForceModel, LayoutConfiguration, Strategy, StrategyConfig};
use sirenia_graph::NodeId;

/// Nodes an algorithm step applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeScope {
    /// The root graph.
    All,
    /// The content of generalization subgraphs.
    Generalization,
    /// Profile nodes only.
    Profile,
}

/// Algorithms the engine is asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineAlgorithm {
    Layered,
    Stress,
    Force,
    Radial,
    /// Overlap removal.
    Spore,
    Random,
    /// Keep positions as they are. Never sent to the engine as a step of its own.
    Fixed,
}

impl EngineAlgorithm {
    /// Identifier understood by the engine.
    pub fn id(self) -> &'static str {
        match self {
            EngineAlgorithm::Layered => "layered",
            EngineAlgorithm::Stress => "stress",
            EngineAlgorithm::Force => "force",
            EngineAlgorithm::Radial => "radial",
            EngineAlgorithm::Spore => "sporeOverlap",
            EngineAlgorithm::Random => "random",
            EngineAlgorithm::Fixed => "fixed",
        }
    }
}

/// Parameters shared by every step compiled from one [`StrategyConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepParams {
    pub direction: Direction,
    pub layer_spacing: f64,
    pub node_spacing: f64,
    pub edge_length: f64,
    pub min_node_distance: f64,
    pub force_model: Option<ForceModel>,
    pub iterations: u32,
    pub interactive: bool,
}

impl From<&StrategyConfig> for StepParams {
    fn from(config: &StrategyConfig) -> Self {
        Self {
            direction: config.direction,
            layer_spacing: config.layer_spacing,
            node_spacing: config.node_spacing,
            edge_length: config.edge_length,
            min_node_distance: config.min_node_distance,
            force_model: config.force_model,
            iterations: config.iterations,
            interactive: config.interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmStep {
    pub algorithm: EngineAlgorithm,
    pub scope: NodeScope,
    /// Run against a clean copy of the graph and copy positions back afterwards.
    pub new_graph: bool,
    pub params: StepParams,
}

impl AlgorithmStep {
    pub fn new(algorithm: EngineAlgorithm, scope: NodeScope, params: StepParams) -> Self {
        Self {
            algorithm,
            scope,
            new_graph: false,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionKind {
    CreateGeneralizationSubgraphs,
    Treeify,
    Clusterify,
    /// Lays out the clusters found by the closest preceding [`ConversionKind::Clusterify`].
    LayoutClusters(StepParams),
    /// Drops synthetic edges and every per-run flag.
    ResetLayout,
}

/// Data produced by a conversion, kept on the action that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Subgraphs(Vec<NodeId>),
    Tree(Treeified),
    Clusters(Clusters),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionStep {
    pub kind: ConversionKind,
    pub result: Option<ConversionResult>,
}

impl ConversionStep {
    pub fn new(kind: ConversionKind) -> Self {
        Self { kind, result: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAction {
    Algorithm(AlgorithmStep),
    Conversion(ConversionStep),
}

impl LayoutAction {
    pub fn algorithm(algorithm: EngineAlgorithm, scope: NodeScope, params: &StepParams) -> Self {
        Self::Algorithm(AlgorithmStep::new(algorithm, scope, params.clone()))
    }

    pub fn conversion(kind: ConversionKind) -> Self {
        Self::Conversion(ConversionStep::new(kind))
    }

    pub fn as_algorithm(&self) -> Option<&AlgorithmStep> {
        match self {
            LayoutAction::Algorithm(step) => Some(step),
            LayoutAction::Conversion(_) => None,
        }
    }

    pub fn as_conversion(&self) -> Option<&ConversionStep> {
        match self {
            LayoutAction::Algorithm(_) => None,
            LayoutAction::Conversion(step) => Some(step),
        }
    }

    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            LayoutAction::Algorithm(step) => step.algorithm.id(),
            LayoutAction::Conversion(step) => match step.kind {
                ConversionKind::CreateGeneralizationSubgraphs => "createGeneralizationSubgraphs",
                ConversionKind::Treeify => "treeify",
                ConversionKind::Clusterify => "clusterify",
                ConversionKind::LayoutClusters(_) => "layoutClusters",
                ConversionKind::ResetLayout => "resetLayout",
            },
        }
    }
}

/// Where an action sits in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreMain(usize),
    Main(usize),
    PostMain(usize),
}

impl Phase {
    pub fn is_main(self) -> bool {
        matches!(self, Phase::Main(_))
    }

    pub fn is_pre_main(self) -> bool {
        matches!(self, Phase::PreMain(_))
    }
}

/// An ordered, replayable layout plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintContainer {
    pub strategy: Strategy,
    pub pre_main: Vec<LayoutAction>,
    pub main: Vec<LayoutAction>,
    pub post_main: Vec<LayoutAction>,
    pub runs: u32,
}

impl ConstraintContainer {
    pub fn compile(config: &LayoutConfiguration) -> Self {
        compile::compile(config)
    }

    /// Automatic containers have no main pipeline of their own.
    pub fn is_automatic(&self) -> bool {
        self.strategy == Strategy::Automatic
    }

    /// Every action with its phase, in execution order.
    pub fn actions(&self) -> impl Iterator<Item = (Phase, &LayoutAction)> {
        let pre = self
            .pre_main
            .iter()
            .enumerate()
            .map(|(i, a)| (Phase::PreMain(i), a));
        let main = self
            .main
            .iter()
            .enumerate()
            .map(|(i, a)| (Phase::Main(i), a));
        let post = self
            .post_main
            .iter()
            .enumerate()
            .map(|(i, a)| (Phase::PostMain(i), a));
        pre.chain(main).chain(post)
    }
}
