//! Street traversal: requests, path states and the per-edge cost model

pub mod context;
pub mod intersection;
pub mod request;
pub mod requirements;
pub mod state;
pub mod traversal;

pub use context::RoutingContext;
pub use intersection::{IntersectionTraversalCostModel, SimpleIntersectionTraversalCostModel};
pub use request::{OptimizeType, RoutingRequest};
pub use requirements::TraversalRequirements;
pub use state::{State, StateEditor};
pub use traversal::overage_penalty;
