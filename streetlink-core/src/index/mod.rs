//! Spatial indices over the street graph and the closest-edge search

pub mod candidate;
pub mod config;
pub mod service;
pub mod spatial;

pub use candidate::{CandidateEdge, CandidateEdgeBundle, DIRECTION_ERROR, DISTANCE_ERROR};
pub use config::{IndexKind, StreetIndexConfig};
pub use service::StreetVertexIndex;
pub use spatial::{HashGridIndex, RTreeIndex, SpatialIndex, build_index};
