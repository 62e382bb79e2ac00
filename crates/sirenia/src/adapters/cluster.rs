//! Cluster-based stress: every cluster is laid out on its own, put back where its root was and
//! frozen, then one global stress pass places the remaining nodes around them.
//!
//! Each cluster is grown toward the sector around its root that the clusters still waiting for
//! their turn crowd the least; the engine receives that sector as the step's `direction`.

use super::step_options;
use crate::algo::{Clusters, cluster_nodes, level_edges, sector_population};
use crate::engine::LayoutEngine;
use crate::error::Result;
use crate::options::{LayoutOptions, keys};
use crate::pipeline::executor::LayoutRun;
use crate::pipeline::{EngineAlgorithm, NodeScope, Phase, StepParams};
use crate::transform::{EngineRequest, layout_with_engine};
use rustc_hash::FxBuildHasher;
use sirenia_graph::{EdgeId, GraphId, LayoutScratch};

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

pub(crate) async fn layout_clusters<E: LayoutEngine>(
    engine: &E,
    run: &mut LayoutRun,
    clusters: &Clusters,
    params: &StepParams,
    phase: Phase,
    seed: u64,
    node_defaults: &LayoutOptions,
) -> Result<()> {
    for (ix, (&root, edges)) in clusters.iter().enumerate() {
        let Some(recorded) = run.graph.node(root).map(|n| n.geometry.position) else {
            continue;
        };
        let members = cluster_nodes(&run.graph, GraphId::ROOT, edges);
        let in_cluster: HashSet<EdgeId> = edges.iter().copied().collect();

        // Clusters placed earlier are pinned and no longer compete for space.
        let others: Vec<EdgeId> = level_edges(&run.graph, &run.scratch, GraphId::ROOT)
            .into_iter()
            .filter(|e| !run.scratch.is_pinned(e.source) && !run.scratch.is_pinned(e.target))
            .map(|e| e.id)
            .filter(|id| !in_cluster.contains(id))
            .collect();
        let direction = sector_population(&run.graph, root, &others).least_crowded();
        tracing::debug!(cluster = ix, ?direction, members = members.len(), "laying out cluster");

        let mut isolated: LayoutScratch = run.scratch.clone();
        for node in run.graph.root().nodes() {
            if !members.contains(&node) {
                isolated.set_node_considered(node, false);
            }
        }
        for edge in run.graph.root().edges() {
            if !in_cluster.contains(&edge) {
                isolated.set_edge_considered(edge, false);
            }
        }

        let cluster_params = StepParams {
            direction,
            ..params.clone()
        };
        let cluster_seed = seed.wrapping_mul(31).wrapping_add(ix as u64);
        let mut steps = Vec::with_capacity(2);
        if !params.interactive {
            steps.push(EngineAlgorithm::Random);
        }
        steps.push(EngineAlgorithm::Stress);
        let mut moved = false;
        for algorithm in steps {
            let mut options = step_options(algorithm, &cluster_params, cluster_seed);
            options.set(keys::DIRECTION, direction.as_str());
            let request = EngineRequest {
                phase,
                scope: NodeScope::All,
                step_options: options,
                node_defaults,
            };
            moved |= layout_with_engine(engine, &mut run.graph, &isolated, &request).await?;
        }
        run.applied |= moved;

        let user_anchored = members
            .iter()
            .any(|&m| run.graph.node(m).is_some_and(|n| n.geometry.anchored));
        if moved && !user_anchored {
            let current = run
                .graph
                .node(root)
                .map(|n| n.geometry.position)
                .unwrap_or(recorded);
            let delta = recorded - current;
            for &member in &members {
                run.graph.translate_node(member, delta);
            }
            for &edge in edges {
                run.graph.translate_edge(edge, delta);
            }
        }
        for &member in &members {
            run.scratch.pin(member);
        }
    }

    let request = EngineRequest {
        phase,
        scope: NodeScope::All,
        step_options: step_options(EngineAlgorithm::Stress, params, seed),
        node_defaults,
    };
    let result = layout_with_engine(engine, &mut run.graph, &run.scratch, &request).await;
    run.scratch.clear_pins();
    run.applied |= result?;
    Ok(())
}
