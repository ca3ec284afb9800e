//! Street network model

pub mod components;
pub mod elevation;
pub mod network;
pub mod permission;
pub mod street_edge;
pub mod turn_restriction;

pub use components::{Edge, EdgeId, EdgeKind, PatternEdge, Vertex, VertexId, VertexKind};
pub use elevation::{ElevationProfile, ElevationProfileSegment, SlopeCosts, WALK_COST_SPEED, walk_cost};
pub use network::StreetGraph;
pub use permission::StreetTraversalPermission;
pub use street_edge::{DEFAULT_CAR_SPEED, StreetClass, StreetEdge};
pub use turn_restriction::{RestrictionTime, TurnRestriction, TurnRestrictionKind};
