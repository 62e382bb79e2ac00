use crate::graph::{EdgeId, GraphId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("node `{key}` already exists")]
    DuplicateNode { key: String },
    #[error("edge `{key}` already exists")]
    DuplicateEdge { key: String },
    #[error("unknown node `{key}`")]
    UnknownNode { key: String },
    #[error("node handle {id:?} does not refer to a live node")]
    MissingNode { id: NodeId },
    #[error("edge handle {id:?} does not refer to a live edge")]
    MissingEdge { id: EdgeId },
    #[error("graph handle {id:?} does not refer to a live graph")]
    MissingGraph { id: GraphId },
    #[error("node `{key}` is not a direct member of graph {graph:?}")]
    NotAMember { key: String, graph: GraphId },
}

pub type Result<T> = std::result::Result<T, Error>;
