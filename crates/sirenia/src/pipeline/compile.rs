use super::{
    ConstraintContainer, ConversionKind, EngineAlgorithm, LayoutAction, NodeScope, StepParams,
};
use crate::config::{LayoutConfiguration, Strategy, StrategyConfig};

pub(super) fn compile(config: &LayoutConfiguration) -> ConstraintContainer {
    let main = &config.main;
    let runs = effective_runs(main, config.runs);

    let mut container = ConstraintContainer {
        strategy: main.algorithm,
        pre_main: Vec::new(),
        main: strategy_actions(main, NodeScope::All, runs),
        post_main: Vec::new(),
        runs,
    };

    if let Some(generalization) = &config.generalization {
        container
            .pre_main
            .push(LayoutAction::conversion(
                ConversionKind::CreateGeneralizationSubgraphs,
            ));
        container.pre_main.extend(strategy_actions(
            generalization,
            NodeScope::Generalization,
            1,
        ));
    }
    if let Some(profile) = &config.profile {
        container
            .pre_main
            .extend(strategy_actions(profile, NodeScope::Profile, 1));
    }

    if main.run_layered_after {
        let mut layered = main.with_algorithm(Strategy::Layered);
        layered.run_layered_after = false;
        let synthetic = LayoutConfiguration::new(layered);
        for mut action in compile(&synthetic).main {
            if let LayoutAction::Algorithm(step) = &mut action {
                step.new_graph = true;
            }
            container.post_main.push(action);
        }
    }

    tracing::debug!(
        strategy = %container.strategy,
        pre_main = container.pre_main.len(),
        main = container.main.len(),
        post_main = container.post_main.len(),
        runs = container.runs,
        "compiled layout pipeline"
    );
    container
}

/// Interactive layouts start from the current positions, so repeating them is pointless.
/// Cluster-based layouts still vary between runs through their warm-starts.
fn effective_runs(main: &StrategyConfig, requested: u32) -> u32 {
    if main.interactive && requested > 1 && main.algorithm != Strategy::ClusterStress {
        1
    } else {
        requested.max(1)
    }
}

fn strategy_actions(config: &StrategyConfig, scope: NodeScope, runs: u32) -> Vec<LayoutAction> {
    let params = StepParams::from(config);
    let step = |algorithm| LayoutAction::algorithm(algorithm, scope, &params);
    let warm_start = runs > 1 && !config.interactive;

    match config.algorithm {
        Strategy::Layered => vec![step(EngineAlgorithm::Layered)],
        Strategy::Stress | Strategy::Force => {
            let main_step = if config.algorithm == Strategy::Stress {
                EngineAlgorithm::Stress
            } else {
                EngineAlgorithm::Force
            };
            let mut actions = Vec::with_capacity(3);
            if warm_start {
                actions.push(step(EngineAlgorithm::Random));
            }
            actions.push(step(main_step));
            actions.push(step(EngineAlgorithm::Spore));
            actions
        }
        Strategy::Radial => vec![
            LayoutAction::conversion(ConversionKind::ResetLayout),
            LayoutAction::conversion(ConversionKind::Treeify),
            step(EngineAlgorithm::Radial),
            step(EngineAlgorithm::Spore),
        ],
        Strategy::Spore => vec![step(EngineAlgorithm::Spore)],
        Strategy::Random => vec![step(EngineAlgorithm::Random)],
        Strategy::ClusterStress => vec![
            LayoutAction::conversion(ConversionKind::Clusterify),
            LayoutAction::conversion(ConversionKind::LayoutClusters(params.clone())),
            LayoutAction::conversion(ConversionKind::ResetLayout),
        ],
        Strategy::Automatic => Vec::new(),
        Strategy::None => vec![step(EngineAlgorithm::Fixed)],
    }
}
