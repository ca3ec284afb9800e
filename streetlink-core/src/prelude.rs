pub use crate::Error;

// Street graph and its building blocks
pub use crate::model::{
    Edge, EdgeId, EdgeKind, GenericLocation, StreetClass, StreetEdge, StreetGraph,
    StreetTraversalPermission, TraverseMode, TraverseModeSet, TurnRestriction,
    TurnRestrictionKind, Vertex, VertexId, VertexKind,
};

// Spatial lookup and location resolution
pub use crate::index::{
    CandidateEdge, CandidateEdgeBundle, IndexKind, StreetIndexConfig, StreetVertexIndex,
};
pub use crate::linking::{DefaultNamer, LocationNamer, RequestScope};

// Street traversal
pub use crate::routing::{
    IntersectionTraversalCostModel, OptimizeType, RoutingContext, RoutingRequest,
    SimpleIntersectionTraversalCostModel, State, StateEditor, TraversalRequirements,
    overage_penalty,
};

pub use crate::Distance; // meters
pub use crate::Time; // epoch seconds
