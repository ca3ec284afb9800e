//! Geometric lookup and street traversal core of a multimodal router.
//!
//! The crate has two halves that share one street graph:
//!
//! - [`index`] and [`linking`] snap free-form coordinates onto the graph,
//!   splitting street edges into request-scoped temporary edges when the
//!   point does not sit on an intersection.
//! - [`routing`] holds the per-edge state transition a path search calls to
//!   cross a street segment under a given mode and request.

pub mod error;
pub mod geometry;
pub mod index;
pub mod linking;
pub mod model;
pub mod prelude;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;
pub use index::{CandidateEdge, CandidateEdgeBundle, IndexKind, StreetIndexConfig, StreetVertexIndex};
pub use linking::{LocationNamer, RequestScope};
pub use model::{
    Edge, EdgeId, EdgeKind, GenericLocation, StreetEdge, StreetGraph, TraverseMode,
    TraverseModeSet, Vertex, VertexId, VertexKind,
};
pub use routing::{
    OptimizeType, RoutingContext, RoutingRequest, State, StateEditor, TraversalRequirements,
    overage_penalty,
};

/// Seconds since the Unix epoch
pub type Time = i64;

/// Meters
pub type Distance = f64;
