//! Street network components - vertices, edges and their identifiers

use std::fmt;

use geo::{Coord, LineString};
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::street_edge::StreetEdge;

/// Vertex identifier. Permanent vertices live in the shared graph,
/// temporary ones in a request scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexId {
    Permanent(NodeIndex),
    Temporary(u32),
}

/// Edge identifier, same split as [`VertexId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeId {
    Permanent(EdgeIndex),
    Temporary(u32),
}

impl EdgeId {
    pub fn is_temporary(&self) -> bool {
        matches!(self, EdgeId::Temporary(_))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeId::Permanent(idx) => write!(f, "e{}", idx.index()),
            EdgeId::Temporary(idx) => write!(f, "t{idx}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VertexKind {
    /// Plain street vertex, e.g. a shape point where two ways meet
    Street,
    Intersection {
        traffic_light: bool,
        free_flowing: bool,
    },
    TransitStop {
        stop_id: String,
        street_linkable: bool,
        wheelchair_entrance: bool,
    },
    /// Request-scoped point on a street. `extra` lists the temporary edges
    /// that connect it to the rest of the graph.
    StreetLocation {
        wheelchair_accessible: bool,
        extra: Vec<EdgeId>,
    },
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub label: String,
    pub name: String,
    pub coordinate: Coord<f64>,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn is_street(&self) -> bool {
        matches!(
            self.kind,
            VertexKind::Street | VertexKind::Intersection { .. } | VertexKind::StreetLocation { .. }
        )
    }

    pub fn is_intersection(&self) -> bool {
        matches!(self.kind, VertexKind::Intersection { .. })
    }

    pub fn is_transit_stop(&self) -> bool {
        matches!(self.kind, VertexKind::TransitStop { .. })
    }

    pub fn is_street_linkable(&self) -> bool {
        matches!(
            self.kind,
            VertexKind::TransitStop {
                street_linkable: true,
                ..
            }
        )
    }

    /// Edges a street location brought with it, empty for other kinds
    pub fn extra_edges(&self) -> &[EdgeId] {
        match &self.kind {
            VertexKind::StreetLocation { extra, .. } => extra,
            _ => &[],
        }
    }
}

/// Transit hop between two stops. Carried so the index can skip it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternEdge {
    pub route_id: String,
    pub geometry: Option<LineString<f64>>,
}

#[derive(Debug, Clone)]
pub enum EdgeKind {
    Street(StreetEdge),
    /// Zero-cost connector used to splice request-scoped vertices in
    Free,
    /// Connector between a street location and a transit stop
    TransitLink,
    Pattern(PatternEdge),
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn street(&self) -> Option<&StreetEdge> {
        match &self.kind {
            EdgeKind::Street(street) => Some(street),
            _ => None,
        }
    }

    pub fn street_mut(&mut self) -> Option<&mut StreetEdge> {
        match &mut self.kind {
            EdgeKind::Street(street) => Some(street),
            _ => None,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self.kind, EdgeKind::Pattern(_))
    }

    pub fn geometry(&self) -> Option<&LineString<f64>> {
        match &self.kind {
            EdgeKind::Street(street) => Some(&street.geometry),
            EdgeKind::Pattern(pattern) => pattern.geometry.as_ref(),
            EdgeKind::Free | EdgeKind::TransitLink => None,
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            EdgeKind::Street(street) => &street.name,
            _ => "",
        }
    }

    pub fn distance(&self) -> f64 {
        self.street().map_or(0.0, |street| street.length)
    }

    /// Same edge, or a split half of it
    pub fn is_equivalent_to(&self, other: EdgeId) -> bool {
        self.id == other || self.street().and_then(|s| s.parent) == Some(other)
    }

    /// True when `other` runs between the same vertices in the opposite
    /// direction along the same geometry
    pub fn is_reverse_of(&self, other: &Edge) -> bool {
        if self.from != other.to || self.to != other.from {
            return false;
        }
        match (self.geometry(), other.geometry()) {
            (Some(a), Some(b)) => is_reversed_line(a, b),
            _ => true,
        }
    }
}

fn is_reversed_line(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    const EPS: f64 = 1e-9;
    a.0.len() == b.0.len()
        && a
            .0
            .iter()
            .zip(b.0.iter().rev())
            .all(|(p, q)| (p.x - q.x).abs() < EPS && (p.y - q.y).abs() < EPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StreetTraversalPermission;
    use geo::line_string;

    fn street(from: u32, to: u32, id: u32, geometry: LineString<f64>) -> Edge {
        Edge {
            id: EdgeId::Temporary(id),
            from: VertexId::Temporary(from),
            to: VertexId::Temporary(to),
            kind: EdgeKind::Street(StreetEdge::new(
                geometry,
                "Main",
                100.0,
                StreetTraversalPermission::ALL,
                false,
            )),
        }
    }

    #[test]
    fn test_reverse_requires_swapped_endpoints_and_geometry() {
        let forward = street(0, 1, 0, line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.001)]);
        let backward = street(1, 0, 1, line_string![(x: 0.0, y: 0.001), (x: 0.0, y: 0.0)]);
        let detour = street(
            1,
            0,
            2,
            line_string![(x: 0.0, y: 0.001), (x: 0.0005, y: 0.0005), (x: 0.0, y: 0.0)],
        );
        assert!(forward.is_reverse_of(&backward));
        assert!(backward.is_reverse_of(&forward));
        assert!(!forward.is_reverse_of(&detour));
        assert!(!forward.is_reverse_of(&forward));
    }

    #[test]
    fn test_split_half_is_equivalent_to_parent() {
        let mut half = street(0, 1, 3, line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.001)]);
        let parent = EdgeId::Temporary(9);
        assert!(!half.is_equivalent_to(parent));
        half.street_mut().unwrap().parent = Some(parent);
        assert!(half.is_equivalent_to(parent));
        assert!(half.is_equivalent_to(EdgeId::Temporary(3)));
    }
}
