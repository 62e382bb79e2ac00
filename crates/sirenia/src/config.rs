//! User-facing layout configuration.
//!
//! Configuration arrives as JSON (typically straight from an editor settings panel), is
//! deserialized into strongly typed structs and validated before any pipeline is compiled.
//! Anything rejected here is a fatal configuration error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    Layered,
    Stress,
    Force,
    Radial,
    /// Overlap removal only.
    Spore,
    Random,
    /// Clusters are laid out one by one before a global stress pass.
    ClusterStress,
    /// Try several strategies and keep the best-scoring result.
    Automatic,
    /// Leave positions untouched.
    None,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Layered,
        Strategy::Stress,
        Strategy::Force,
        Strategy::Radial,
        Strategy::Spore,
        Strategy::Random,
        Strategy::ClusterStress,
        Strategy::Automatic,
        Strategy::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Layered => "layered",
            Strategy::Stress => "stress",
            Strategy::Force => "force",
            Strategy::Radial => "radial",
            Strategy::Spore => "spore",
            Strategy::Random => "random",
            Strategy::ClusterStress => "clusterStress",
            Strategy::Automatic => "automatic",
            Strategy::None => "none",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| Error::config(format!("unknown layout algorithm `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForceModel {
    FruchtermanReingold,
    Eades,
}

impl ForceModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ForceModel::FruchtermanReingold => "FRUCHTERMAN_REINGOLD",
            ForceModel::Eades => "EADES",
        }
    }
}

/// Parameters for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub algorithm: Strategy,
    #[serde(default)]
    pub direction: Direction,
    /// Distance between consecutive layers (layered).
    #[serde(default = "default_layer_spacing")]
    pub layer_spacing: f64,
    /// Distance between nodes of the same layer (layered).
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,
    /// Desired edge length (stress, force, cluster-based stress).
    #[serde(default = "default_edge_length")]
    pub edge_length: f64,
    /// Minimum separation kept by overlap removal.
    #[serde(default = "default_min_node_distance")]
    pub min_node_distance: f64,
    #[serde(default)]
    pub force_model: Option<ForceModel>,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Reuse current positions as the starting point.
    #[serde(default)]
    pub interactive: bool,
    /// Run a layered pass once the strategy finished.
    #[serde(default)]
    pub run_layered_after: bool,
}

fn default_layer_spacing() -> f64 {
    50.0
}

fn default_node_spacing() -> f64 {
    40.0
}

fn default_edge_length() -> f64 {
    100.0
}

fn default_min_node_distance() -> f64 {
    20.0
}

fn default_iterations() -> u32 {
    300
}

impl StrategyConfig {
    pub fn new(algorithm: Strategy) -> Self {
        Self {
            algorithm,
            direction: Direction::default(),
            layer_spacing: default_layer_spacing(),
            node_spacing: default_node_spacing(),
            edge_length: default_edge_length(),
            min_node_distance: default_min_node_distance(),
            force_model: None,
            iterations: default_iterations(),
            interactive: false,
            run_layered_after: false,
        }
    }

    /// Same parameters with another algorithm.
    pub fn with_algorithm(&self, algorithm: Strategy) -> Self {
        Self {
            algorithm,
            ..self.clone()
        }
    }

    fn validate(&self, role: &str) -> Result<()> {
        let lengths = [
            ("layerSpacing", self.layer_spacing),
            ("nodeSpacing", self.node_spacing),
            ("edgeLength", self.edge_length),
            ("minNodeDistance", self.min_node_distance),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "{role}.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if self.iterations == 0 {
            return Err(Error::config(format!("{role}.iterations must be at least 1")));
        }
        if self.algorithm == Strategy::Force && self.force_model.is_none() {
            return Err(Error::config(format!(
                "{role}.forceModel is required by the force algorithm"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfiguration {
    pub main: StrategyConfig,
    /// Pre-positions generalization hierarchies inside their own subgraphs.
    #[serde(default)]
    pub generalization: Option<StrategyConfig>,
    /// Pre-positions profile nodes.
    #[serde(default)]
    pub profile: Option<StrategyConfig>,
    /// How many times the main pipeline runs; the best-scoring run wins.
    #[serde(default = "default_runs")]
    pub runs: u32,
}

fn default_runs() -> u32 {
    1
}

impl LayoutConfiguration {
    pub fn new(main: StrategyConfig) -> Self {
        Self {
            main,
            generalization: None,
            profile: None,
            runs: default_runs(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: LayoutConfiguration =
            serde_json::from_value(value).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(Error::config("runs must be at least 1"));
        }
        self.main.validate("main")?;
        let pre_passes = [
            ("generalization", self.generalization.as_ref()),
            ("profile", self.profile.as_ref()),
        ];
        for (role, config) in pre_passes {
            let Some(config) = config else {
                continue;
            };
            // Tree and cluster conversions only operate on the root level.
            if matches!(
                config.algorithm,
                Strategy::Automatic | Strategy::ClusterStress | Strategy::Radial
            ) {
                return Err(Error::config(format!(
                    "{role} pre-positioning cannot use the {} algorithm",
                    config.algorithm
                )));
            }
            config.validate(role)?;
        }
        Ok(())
    }
}
