//! Executes compiled layout actions against one graph snapshot.

use super::{
    AlgorithmStep, ConversionKind, ConversionResult, ConversionStep, EngineAlgorithm,
    LayoutAction, Phase,
};
use crate::adapters::{layout_clusters, step_options};
use crate::algo::{clusterify, treeify};
use crate::engine::LayoutEngine;
use crate::error::Result;
use crate::options::{LayoutOptions, keys};
use crate::transform::{EngineRequest, layout_with_engine};
use sirenia_graph::{GraphId, LayoutScratch, MainGraph};

/// A graph snapshot together with its per-run scratch state.
#[derive(Debug, Clone)]
pub(crate) struct LayoutRun {
    pub graph: MainGraph,
    pub scratch: LayoutScratch,
    /// Whether any engine result was written onto `graph`.
    pub applied: bool,
}

impl LayoutRun {
    pub fn new(graph: MainGraph) -> Self {
        let scratch = LayoutScratch::new(&graph);
        Self {
            graph,
            scratch,
            applied: false,
        }
    }
}

pub(crate) struct Executor<'a, E> {
    pub engine: &'a E,
    pub node_defaults: &'a LayoutOptions,
}

impl<E: LayoutEngine> Executor<'_, E> {
    /// Runs `actions` in order. Conversion results are stored on their actions so later steps
    /// of the same list can read them.
    pub async fn run_actions(
        &self,
        run: &mut LayoutRun,
        actions: &mut [LayoutAction],
        phase: fn(usize) -> Phase,
        seed: u64,
    ) -> Result<()> {
        for ix in 0..actions.len() {
            let (done, rest) = actions.split_at_mut(ix);
            let Some(action) = rest.first_mut() else {
                break;
            };
            let phase = phase(ix);
            tracing::debug!(?phase, action = action.label(), "executing layout action");
            match action {
                LayoutAction::Algorithm(step) => {
                    self.run_algorithm(run, step, done, phase, seed).await?;
                }
                LayoutAction::Conversion(step) => {
                    self.run_conversion(run, step, done, phase, seed).await?;
                }
            }
        }
        Ok(())
    }

    async fn run_algorithm(
        &self,
        run: &mut LayoutRun,
        step: &AlgorithmStep,
        done: &[LayoutAction],
        phase: Phase,
        seed: u64,
    ) -> Result<()> {
        if step.algorithm == EngineAlgorithm::Fixed {
            return Ok(());
        }
        let mut options = step_options(step.algorithm, &step.params, seed);
        if step.algorithm == EngineAlgorithm::Radial {
            let root = latest_tree_root(done).and_then(|id| run.graph.node(id));
            if let Some(root) = root {
                options.set(keys::RADIAL_ROOT, root.key());
            }
        }
        let request = EngineRequest {
            phase,
            scope: step.scope,
            step_options: options,
            node_defaults: self.node_defaults,
        };

        if !step.new_graph {
            let applied =
                layout_with_engine(self.engine, &mut run.graph, &run.scratch, &request).await?;
            run.applied |= applied;
            return Ok(());
        }

        let mut fresh = run.graph.clone();
        fresh.reset_for_new_layout();
        let scratch = LayoutScratch::new(&fresh);
        if layout_with_engine(self.engine, &mut fresh, &scratch, &request).await? {
            copy_geometry(&fresh, &mut run.graph);
            run.applied = true;
        }
        Ok(())
    }

    async fn run_conversion(
        &self,
        run: &mut LayoutRun,
        step: &mut ConversionStep,
        done: &[LayoutAction],
        phase: Phase,
        seed: u64,
    ) -> Result<()> {
        match &step.kind {
            ConversionKind::CreateGeneralizationSubgraphs => {
                let created = run.graph.create_generalization_subgraphs()?;
                run.scratch.reset(&run.graph);
                step.result = Some(ConversionResult::Subgraphs(created));
            }
            ConversionKind::Treeify => {
                let tree = treeify(&mut run.graph, &mut run.scratch, GraphId::ROOT)?;
                step.result = Some(ConversionResult::Tree(tree));
            }
            ConversionKind::Clusterify => {
                let clusters = clusterify(&run.graph, &run.scratch, GraphId::ROOT);
                step.result = Some(ConversionResult::Clusters(clusters));
            }
            ConversionKind::LayoutClusters(params) => {
                let clusters = done
                    .iter()
                    .rev()
                    .filter_map(LayoutAction::as_conversion)
                    .find_map(|c| match &c.result {
                        Some(ConversionResult::Clusters(clusters)) => Some(clusters),
                        _ => None,
                    });
                let Some(clusters) = clusters else {
                    tracing::warn!(?phase, "no clusters to lay out");
                    return Ok(());
                };
                layout_clusters(
                    self.engine,
                    run,
                    clusters,
                    params,
                    phase,
                    seed,
                    self.node_defaults,
                )
                .await?;
            }
            ConversionKind::ResetLayout => {
                run.graph.remove_synthetic_edges();
                run.scratch.reset(&run.graph);
            }
        }
        Ok(())
    }
}

fn latest_tree_root(done: &[LayoutAction]) -> Option<sirenia_graph::NodeId> {
    done.iter()
        .rev()
        .filter_map(LayoutAction::as_conversion)
        .find_map(|c| match &c.result {
            Some(ConversionResult::Tree(tree)) => tree.root,
            _ => None,
        })
}

/// Copies positions, container sizes and real waypoints of `from` onto `to`.
fn copy_geometry(from: &MainGraph, to: &mut MainGraph) {
    for node in from.nodes() {
        let Some(target) = to.node_mut(node.id()) else {
            continue;
        };
        target.geometry.position = node.geometry.position;
        if node.is_subgraph() {
            target.geometry.width = node.geometry.width;
            target.geometry.height = node.geometry.height;
        }
    }
    for edge in from.edges().filter(|e| !e.is_synthetic()) {
        if let Some(target) = to.edge_mut(edge.id()) {
            target.waypoints = edge.waypoints.clone();
        }
    }
}
