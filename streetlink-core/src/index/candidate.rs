//! Street edges near a query point, scored and grouped by physical street

use geo::Coord;

use crate::geometry::{degrees_to_meters, project_onto_line};
use crate::model::{Edge, StreetEdge, TraverseModeSet, VertexId};

/// Candidates closer than this in distance (degrees) may share a bundle
pub const DISTANCE_ERROR: f64 = 0.000_001;
/// Candidates closer than this in approach direction (radians) may share a bundle
pub const DIRECTION_ERROR: f64 = 0.05;

/// One street edge scored against a query point
#[derive(Debug, Clone)]
pub struct CandidateEdge<'a> {
    pub edge: &'a Edge,
    pub street: &'a StreetEdge,
    pub nearest_point: Coord<f64>,
    /// Distance to `nearest_point` in degrees, longitude scaled by `cos(lat)`
    pub distance: f64,
    /// Direction from the query point to `nearest_point`, radians
    pub direction_to_edge: f64,
    /// Direction of the nearest segment, radians
    pub direction_of_edge: f64,
    /// Set when the nearest point is one of the edge's ends
    pub endwise_vertex: Option<VertexId>,
    pub preference: f64,
    pub modes: TraverseModeSet,
    /// Lower is better
    pub score: f64,
}

impl<'a> CandidateEdge<'a> {
    /// `None` if `edge` is not a street edge with usable geometry
    pub fn new(
        edge: &'a Edge,
        location: Coord<f64>,
        preference: f64,
        modes: TraverseModeSet,
    ) -> Option<Self> {
        let street = edge.street()?;
        let geometry = &street.geometry;
        let projection = project_onto_line(geometry, location)?;

        let xscale = location.y.to_radians().cos();
        let a = geometry.0[projection.segment];
        let b = geometry.0[projection.segment + 1];
        let direction_of_edge = (b.y - a.y).atan2((b.x - a.x) * xscale);
        let nearest_point = projection.point;
        let direction_to_edge =
            (nearest_point.y - location.y).atan2((nearest_point.x - location.x) * xscale);

        let endwise_vertex = projection.is_endpoint(geometry).then(|| {
            if projection.segment == 0 && projection.fraction <= 0.0 {
                edge.from
            } else {
                edge.to
            }
        });

        let mut candidate = Self {
            edge,
            street,
            nearest_point,
            distance: projection.distance,
            direction_to_edge,
            direction_of_edge,
            endwise_vertex,
            preference,
            modes,
            score: 0.0,
        };
        candidate.score = candidate.compute_score();
        Some(candidate)
    }

    /// Distance in meters, inflated by up to half for oblique approaches,
    /// divided by the preference
    fn compute_score(&self) -> f64 {
        let meters = degrees_to_meters(self.distance);
        let angle_deviation = if self.distance < DISTANCE_ERROR {
            0.0
        } else {
            1.0 - (self.direction_to_edge - self.direction_of_edge).sin().abs()
        };
        meters * (1.0 + 0.5 * angle_deviation) / self.preference
    }

    pub fn is_endwise(&self) -> bool {
        self.endwise_vertex.is_some()
    }

    pub fn allows_cars(&self) -> bool {
        self.street.permission.car
    }

    pub fn is_platform(&self) -> bool {
        self.street.street_class.is_platform()
    }
}

/// Candidates that represent the same physical street, typically both
/// directions of a two-way street. Never empty.
#[derive(Debug, Clone)]
pub struct CandidateEdgeBundle<'a> {
    candidates: Vec<CandidateEdge<'a>>,
    best: usize,
}

impl<'a> CandidateEdgeBundle<'a> {
    pub fn new(first: CandidateEdge<'a>) -> Self {
        Self {
            candidates: vec![first],
            best: 0,
        }
    }

    pub fn push(&mut self, candidate: CandidateEdge<'a>) {
        if candidate.score < self.candidates[self.best].score {
            self.best = self.candidates.len();
        }
        self.candidates.push(candidate);
    }

    /// Lowest-score member
    pub fn best(&self) -> &CandidateEdge<'a> {
        &self.candidates[self.best]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateEdge<'a>> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn allows_cars(&self) -> bool {
        self.candidates.iter().any(CandidateEdge::allows_cars)
    }

    pub fn is_platform(&self) -> bool {
        self.candidates.iter().any(CandidateEdge::is_platform)
    }

    pub fn to_edge_list(&self) -> Vec<&'a Edge> {
        self.candidates.iter().map(|c| c.edge).collect()
    }

    /// Groups candidates whose distance and approach direction agree within
    /// [`DISTANCE_ERROR`] and [`DIRECTION_ERROR`]. Each candidate joins the
    /// first matching bundle; bundles keep insertion order.
    pub fn bin_by_distance_and_angle(candidates: Vec<CandidateEdge<'a>>) -> Vec<Self> {
        let mut bundles: Vec<(f64, f64, CandidateEdgeBundle<'a>)> = Vec::new();
        for candidate in candidates {
            let bin = bundles.iter_mut().find(|(distance, direction, _)| {
                (direction - candidate.direction_to_edge).abs() < DIRECTION_ERROR
                    && (distance - candidate.distance).abs() < DISTANCE_ERROR
            });
            match bin {
                Some((_, _, bundle)) => bundle.push(candidate),
                None => bundles.push((
                    candidate.distance,
                    candidate.direction_to_edge,
                    CandidateEdgeBundle::new(candidate),
                )),
            }
        }
        bundles.into_iter().map(|(_, _, bundle)| bundle).collect()
    }
}
