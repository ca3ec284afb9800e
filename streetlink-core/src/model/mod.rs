//! Data model: travel modes, requested locations and the street graph

pub mod location;
pub mod modes;
pub mod streets;

pub use location::GenericLocation;
pub use modes::{TraverseMode, TraverseModeSet};
pub use streets::{
    DEFAULT_CAR_SPEED, Edge, EdgeId, EdgeKind, ElevationProfile, ElevationProfileSegment,
    PatternEdge, RestrictionTime, SlopeCosts, StreetClass, StreetEdge, StreetGraph,
    StreetTraversalPermission, TurnRestriction, TurnRestrictionKind, Vertex, VertexId, VertexKind,
    WALK_COST_SPEED, walk_cost,
};
