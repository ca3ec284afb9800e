//! Spatial lookups over a frozen street graph

use std::sync::Arc;

use geo::{BoundingRect, Coord, Rect};
use hashbrown::HashSet;
use log::{debug, info};
use petgraph::graph::{EdgeIndex, NodeIndex};
use rayon::prelude::*;

use super::candidate::{CandidateEdge, CandidateEdgeBundle};
use super::config::StreetIndexConfig;
use super::spatial::{SpatialIndex, build_index};
use crate::Error;
use crate::geometry::{EnvelopeExt, distance, fast_distance, meters_to_degrees, meters_to_lon_degrees};
use crate::linking::{DefaultNamer, LocationNamer, RequestScope};
use crate::model::{Edge, EdgeId, GenericLocation, StreetGraph, Vertex};
use crate::routing::TraversalRequirements;

/// Edges listed in `preferred_edges` have their score divided by this
const PREFERRED_EDGE_PREFERENCE: f64 = 3.0;

/// Spatial indices over the edges, transit stops and vertices of a street
/// graph, plus the queries built on them.
///
/// The graph is shared, never mutated. Request-scoped vertices and edges
/// live in a [`RequestScope`] passed to the queries that need them.
pub struct StreetVertexIndex {
    graph: Arc<StreetGraph>,
    config: StreetIndexConfig,
    edges: Box<dyn SpatialIndex<EdgeIndex>>,
    stops: Box<dyn SpatialIndex<NodeIndex>>,
    vertices: Box<dyn SpatialIndex<NodeIndex>>,
    pub(crate) namer: Box<dyn LocationNamer>,
}

impl StreetVertexIndex {
    /// Indexes `graph` with the default configuration
    pub fn new(graph: Arc<StreetGraph>) -> Self {
        let config = StreetIndexConfig::default();
        Self::build(graph, config)
    }

    pub fn with_config(graph: Arc<StreetGraph>, config: StreetIndexConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(graph, config))
    }

    fn build(graph: Arc<StreetGraph>, config: StreetIndexConfig) -> Self {
        let inner = graph.inner();

        // Transit pattern edges are left out: without shapes they become long
        // straight spans that fill a grid index with false positives.
        let edge_entries: Vec<(Rect<f64>, EdgeIndex)> = inner
            .raw_edges()
            .par_iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                if raw.weight.is_pattern() {
                    return None;
                }
                let envelope = raw.weight.geometry()?.bounding_rect()?;
                Some((envelope, EdgeIndex::new(i)))
            })
            .collect();

        let vertex_entries: Vec<(Rect<f64>, NodeIndex, bool)> = inner
            .raw_nodes()
            .par_iter()
            .enumerate()
            .map(|(i, raw)| {
                (
                    Rect::around(raw.weight.coordinate),
                    NodeIndex::new(i),
                    raw.weight.is_transit_stop(),
                )
            })
            .collect();
        let stop_entries: Vec<(Rect<f64>, NodeIndex)> = vertex_entries
            .iter()
            .filter(|(_, _, is_stop)| *is_stop)
            .map(|(env, idx, _)| (*env, *idx))
            .collect();
        let vertex_entries: Vec<(Rect<f64>, NodeIndex)> = vertex_entries
            .into_iter()
            .map(|(env, idx, _)| (env, idx))
            .collect();

        info!(
            "Building {:?} street index: {} edges, {} stops, {} vertices",
            config.kind,
            edge_entries.len(),
            stop_entries.len(),
            vertex_entries.len()
        );

        Self {
            edges: build_index(edge_entries, &config),
            stops: build_index(stop_entries, &config),
            vertices: build_index(vertex_entries, &config),
            graph,
            config,
            namer: Box::new(DefaultNamer),
        }
    }

    /// Replaces the collaborator that names corner locations
    #[must_use]
    pub fn with_namer(mut self, namer: impl LocationNamer + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<StreetGraph> {
        Arc::clone(&self.graph)
    }

    pub fn config(&self) -> &StreetIndexConfig {
        &self.config
    }

    /// Transit stops within `radius` meters of `coord`
    pub fn nearby_transit_stops(&self, coord: Coord<f64>, radius: f64) -> Vec<&Vertex> {
        let envelope = Rect::around(coord).expand_by(
            meters_to_lon_degrees(radius, coord.y),
            meters_to_degrees(radius),
        );
        self.stops_in_envelope(&envelope)
            .into_iter()
            .filter(|stop| distance(stop.coordinate, coord) <= radius)
            .collect()
    }

    pub fn vertices_in_envelope(&self, envelope: &Rect<f64>) -> Vec<&Vertex> {
        self.vertices
            .query(envelope)
            .into_iter()
            .filter_map(|idx| self.graph.vertex(idx))
            .filter(|v| envelope.covers(v.coordinate))
            .collect()
    }

    pub fn edges_in_envelope(&self, envelope: &Rect<f64>) -> Vec<&Edge> {
        self.edges
            .query(envelope)
            .into_iter()
            .filter_map(|idx| self.graph.edge(idx))
            .filter(|e| {
                e.geometry()
                    .and_then(|g| g.bounding_rect())
                    .is_some_and(|env| envelope.overlaps(&env))
            })
            .collect()
    }

    pub fn stops_in_envelope(&self, envelope: &Rect<f64>) -> Vec<&Vertex> {
        self.stops
            .query(envelope)
            .into_iter()
            .filter_map(|idx| self.graph.vertex(idx))
            .filter(|v| envelope.covers(v.coordinate))
            .collect()
    }

    /// Closest street vertex within the corner distance, by approximate
    /// distance
    pub fn nearest_intersection(&self, coord: Coord<f64>) -> Option<&Vertex> {
        let radius = self.config.corner_distance;
        let envelope = Rect::around(coord).expand_by(
            meters_to_lon_degrees(radius, coord.y),
            meters_to_degrees(radius),
        );
        self.vertices_in_envelope(&envelope)
            .into_iter()
            .filter(|v| v.is_street())
            .map(|v| (fast_distance(coord, v.coordinate), v))
            .filter(|(d, _)| *d < radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| v)
    }

    /// Bundle of street edges closest to `location`.
    ///
    /// The search envelope grows by `search_step` until some traversable
    /// edge lies within the current radius, giving up once the radius passes
    /// `max_search_radius`. Temporary street edges of `scope` and the
    /// `extra_edges` are considered at every step.
    pub fn closest_edges<'a>(
        &'a self,
        location: &GenericLocation,
        requirements: &TraversalRequirements,
        scope: &'a RequestScope,
        extra_edges: &[EdgeId],
        preferred_edges: &[EdgeId],
        transit_links_only: bool,
    ) -> Option<CandidateEdgeBundle<'a>> {
        let coord = location.coordinate?;
        let step = self.config.search_step;

        let extra: Vec<&'a Edge> = extra_edges
            .iter()
            .filter_map(|id| scope.edge(*id))
            .chain(scope.street_edges())
            .collect();

        // counting steps keeps float drift from dropping the last ring
        let max_steps = (self.config.max_search_radius / step).round() as u32;
        let mut step_count = 0;
        let candidates = loop {
            step_count += 1;
            if step_count > max_steps {
                debug!(
                    "No street within {} degrees of {location}",
                    self.config.max_search_radius
                );
                return None;
            }
            let radius = step * f64::from(step_count);
            let envelope = Rect::around(coord).expand_by(radius, radius);

            let mut seen = HashSet::new();
            let found: Vec<CandidateEdge<'a>> = self
                .edges_in_envelope(&envelope)
                .into_iter()
                .chain(extra.iter().copied())
                .filter(|edge| seen.insert(edge.id))
                .filter(|edge| {
                    edge.street()
                        .is_some_and(|street| requirements.can_be_traversed(street))
                })
                .filter_map(|edge| {
                    let preference = if preferred_edges.contains(&edge.id) {
                        PREFERRED_EDGE_PREFERENCE
                    } else {
                        1.0
                    };
                    CandidateEdge::new(edge, coord, preference, requirements.modes)
                })
                // envelopes can intersect without the edge being within the radius
                .filter(|candidate| candidate.distance < radius)
                .collect();

            if !found.is_empty() {
                break found;
            }
        };

        let mut best: Option<CandidateEdgeBundle<'a>> = None;
        for bundle in CandidateEdgeBundle::bin_by_distance_and_angle(candidates) {
            let better = best
                .as_ref()
                .is_none_or(|b| bundle.best().score < b.best().score);
            if !better {
                continue;
            }
            // assumes every way closed to cars that matters is tagged as a platform
            if transit_links_only && !(bundle.allows_cars() || bundle.is_platform()) {
                continue;
            }
            best = Some(bundle);
        }
        best
    }
}

impl std::fmt::Debug for StreetVertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreetVertexIndex")
            .field("config", &self.config)
            .field("edges", &self.edges.len())
            .field("stops", &self.stops.len())
            .field("vertices", &self.vertices.len())
            .finish()
    }
}
