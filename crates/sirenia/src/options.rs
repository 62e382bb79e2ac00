//! Layout options passed to the engine.
//!
//! Options are plain string pairs attached to engine nodes and edges. They are attached at three
//! scopes: a default set for every node, the options of the executing pipeline step (only on the
//! container the step targets), and per-edge overrides.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Well-known option keys understood by the engine.
pub mod keys {
    pub const ALGORITHM: &str = "algorithm";
    pub const DIRECTION: &str = "direction";
    pub const NODE_SPACING: &str = "spacing.nodeNode";
    pub const LAYER_SPACING: &str = "spacing.nodeNodeBetweenLayers";
    pub const EDGE_LENGTH: &str = "desiredEdgeLength";
    pub const MIN_NODE_DISTANCE: &str = "overlapRemoval.minDistance";
    pub const FORCE_MODEL: &str = "force.model";
    pub const ITERATIONS: &str = "iterations";
    pub const INTERACTIVE: &str = "interactive";
    pub const RANDOM_SEED: &str = "randomSeed";
    pub const RADIAL_ROOT: &str = "radial.root";
    /// Node-level: the engine must keep the node where it is.
    pub const FIXED: &str = "fixed";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutOptions(IndexMap<String, String>);

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every entry of `other` over this set; `other` wins on conflicts.
    pub fn merge(&mut self, other: &LayoutOptions) -> &mut Self {
        self.merge_map(&other.0)
    }

    pub fn merge_map(&mut self, other: &IndexMap<String, String>) -> &mut Self {
        for (k, v) in other {
            self.0.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn merged(&self, other: &LayoutOptions) -> LayoutOptions {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for LayoutOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = LayoutOptions::new();
        for (k, v) in iter {
            out.set(k, v);
        }
        out
    }
}
