use std::sync::Arc;

use log::debug;

use crate::Error;
use crate::index::StreetVertexIndex;
use crate::linking::RequestScope;
use crate::model::{Edge, EdgeId, GenericLocation, StreetGraph, Vertex, VertexId};
use crate::routing::{IntersectionTraversalCostModel, RoutingRequest, SimpleIntersectionTraversalCostModel};

/// Everything one search needs besides the shared graph: the request, its
/// bike-walking variant, the resolved endpoints and the temporary vertices
/// and edges created for them.
pub struct RoutingContext<'g> {
    graph: &'g StreetGraph,
    scope: RequestScope,
    from: Option<VertexId>,
    to: Option<VertexId>,
    request: RoutingRequest,
    bike_walking_request: RoutingRequest,
    cost_model: Arc<dyn IntersectionTraversalCostModel>,
}

impl<'g> RoutingContext<'g> {
    /// Validates `request` and resolves both endpoints, origin first
    pub fn new(
        index: &'g StreetVertexIndex,
        request: RoutingRequest,
        from: &GenericLocation,
        to: &GenericLocation,
    ) -> Result<Self, Error> {
        request.validate()?;
        let mut scope = RequestScope::new();
        let from_vertex = index
            .resolve(from, &request, &mut scope, None)
            .ok_or_else(|| Error::LocationNotFound(from.to_string()))?;
        let to_vertex = index
            .resolve(to, &request, &mut scope, Some(from_vertex))
            .ok_or_else(|| Error::LocationNotFound(to.to_string()))?;
        debug!(
            "Routing context from {from_vertex:?} to {to_vertex:?} with {} temporary edges",
            scope.edges().len()
        );

        let mut ctx = Self::with_scope(index.graph(), request, scope);
        ctx.from = Some(from_vertex);
        ctx.to = Some(to_vertex);
        Ok(ctx)
    }

    /// Context over an existing scope, without resolved endpoints
    pub fn with_scope(graph: &'g StreetGraph, request: RoutingRequest, scope: RequestScope) -> Self {
        let bike_walking_request = request.bike_walking_options();
        Self {
            graph,
            scope,
            from: None,
            to: None,
            request,
            bike_walking_request,
            cost_model: Arc::new(SimpleIntersectionTraversalCostModel::default()),
        }
    }

    #[must_use]
    pub fn with_cost_model(mut self, cost_model: Arc<dyn IntersectionTraversalCostModel>) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn graph(&self) -> &'g StreetGraph {
        self.graph
    }

    pub fn request(&self) -> &RoutingRequest {
        &self.request
    }

    /// The request with bicycle swapped for walking a bike
    pub fn bike_walking_request(&self) -> &RoutingRequest {
        &self.bike_walking_request
    }

    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    pub fn cost_model(&self) -> &dyn IntersectionTraversalCostModel {
        self.cost_model.as_ref()
    }

    pub fn from_vertex(&self) -> Option<VertexId> {
        self.from
    }

    pub fn to_vertex(&self) -> Option<VertexId> {
        self.to
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        match id {
            VertexId::Permanent(idx) => self.graph.vertex(idx),
            VertexId::Temporary(_) => self.scope.vertex(id),
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        match id {
            EdgeId::Permanent(idx) => self.graph.edge(idx),
            EdgeId::Temporary(_) => self.scope.edge(id),
        }
    }

    /// Edges leaving `id`, permanent ones first
    pub fn outgoing(&self, id: VertexId) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = match id {
            VertexId::Permanent(idx) => self.graph.outgoing(idx).collect(),
            VertexId::Temporary(_) => Vec::new(),
        };
        edges.extend(self.scope.edges().iter().filter(|e| e.from == id));
        edges
    }

    /// Edges arriving at `id`, permanent ones first
    pub fn incoming(&self, id: VertexId) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = match id {
            VertexId::Permanent(idx) => self.graph.incoming(idx).collect(),
            VertexId::Temporary(_) => Vec::new(),
        };
        edges.extend(self.scope.edges().iter().filter(|e| e.to == id));
        edges
    }
}

impl std::fmt::Debug for RoutingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingContext")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("request", &self.request)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
