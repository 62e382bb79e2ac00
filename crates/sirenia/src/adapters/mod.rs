//! Strategy adapters: translate pipeline steps into engine options and drive the transformer.

mod cluster;

pub(crate) use cluster::layout_clusters;

use crate::options::{LayoutOptions, keys};
use crate::pipeline::{EngineAlgorithm, StepParams};

/// Options attached to the containers a step targets.
pub fn step_options(algorithm: EngineAlgorithm, params: &StepParams, seed: u64) -> LayoutOptions {
    let mut options = LayoutOptions::new();
    options.set(keys::ALGORITHM, algorithm.id());
    if params.interactive {
        options.set(keys::INTERACTIVE, true);
    }
    match algorithm {
        EngineAlgorithm::Layered => {
            options
                .set(keys::DIRECTION, params.direction.as_str())
                .set(keys::LAYER_SPACING, params.layer_spacing)
                .set(keys::NODE_SPACING, params.node_spacing);
        }
        EngineAlgorithm::Stress => {
            options
                .set(keys::EDGE_LENGTH, params.edge_length)
                .set(keys::ITERATIONS, params.iterations);
        }
        EngineAlgorithm::Force => {
            if let Some(model) = params.force_model {
                options.set(keys::FORCE_MODEL, model.as_str());
            }
            options
                .set(keys::ITERATIONS, params.iterations)
                .set(keys::EDGE_LENGTH, params.edge_length);
        }
        EngineAlgorithm::Radial => {
            options.set(keys::NODE_SPACING, params.node_spacing);
        }
        EngineAlgorithm::Spore => {
            options.set(keys::MIN_NODE_DISTANCE, params.min_node_distance);
        }
        EngineAlgorithm::Random => {
            options.set(keys::RANDOM_SEED, seed);
        }
        EngineAlgorithm::Fixed => {}
    }
    options
}
