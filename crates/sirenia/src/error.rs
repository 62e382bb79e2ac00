use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration: {message}")]
    Config { message: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("node `{node}` has no {dimension} at serialization time")]
    MissingDimension {
        node: String,
        dimension: &'static str,
    },
    #[error("node `{node}` is not inside the subgraph being split")]
    SubgraphNotFound { node: String },
    #[error(transparent)]
    Graph(#[from] sirenia_graph::Error),
    #[error("failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
