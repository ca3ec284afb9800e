use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Invalid vertex index")]
    InvalidVertexIndex,
    #[error("Duplicate vertex label: {0}")]
    DuplicateVertexLabel(String),
    #[error("Invalid edge index")]
    InvalidEdgeIndex,
    #[error("Edge {0:?} is not a street edge")]
    NotAStreetEdge(crate::EdgeId),
    #[error("No vertex found for location: {0}")]
    LocationNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
