//! Integer handles into the [`MainGraph`](super::MainGraph) arena.
//!
//! Handles stay valid for the lifetime of the arena: removed slots are tombstoned, never reused.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(in crate::graph) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(in crate::graph) fn from_index(ix: usize) -> Self {
        Self(ix as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(in crate::graph) u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(in crate::graph) fn from_index(ix: usize) -> Self {
        Self(ix as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(pub(in crate::graph) u32);

impl GraphId {
    /// The top-level graph of every [`MainGraph`](super::MainGraph).
    pub const ROOT: GraphId = GraphId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub(in crate::graph) fn from_index(ix: usize) -> Self {
        Self(ix as u32)
    }
}
