use crate::model::{StreetEdge, TraverseMode, TraverseModeSet};
use crate::routing::RoutingRequest;

/// The subset of a request that decides whether a street can be used at
/// all, independent of search state
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalRequirements {
    pub modes: TraverseModeSet,
    pub wheelchair_accessible: bool,
    pub max_slope: f64,
}

impl Default for TraversalRequirements {
    /// Accepts every street
    fn default() -> Self {
        Self {
            modes: TraverseModeSet::all(),
            wheelchair_accessible: false,
            max_slope: f64::INFINITY,
        }
    }
}

impl From<&RoutingRequest> for TraversalRequirements {
    fn from(request: &RoutingRequest) -> Self {
        Self {
            modes: request.modes,
            wheelchair_accessible: request.wheelchair_accessible,
            max_slope: request.max_slope,
        }
    }
}

impl TraversalRequirements {
    /// True if some requested mode can use the edge, counting a cyclist
    /// pushing their bike on a footway
    pub fn can_be_traversed(&self, edge: &StreetEdge) -> bool {
        if self.wheelchair_accessible
            && (!edge.wheelchair_accessible || edge.elevation.max_slope() > self.max_slope)
        {
            return false;
        }
        edge.permission.allows_any(&self.modes)
            || (self.modes.bicycle() && edge.permission.allows(TraverseMode::Walk))
    }
}
