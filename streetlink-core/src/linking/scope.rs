//! Request-scoped vertices and edges spliced onto the shared graph

use geo::Coord;
use log::{debug, trace};

use crate::geometry::{distance, line_length, project_onto_line, split_line_at};
use crate::model::{Edge, EdgeId, EdgeKind, StreetGraph, Vertex, VertexId, VertexKind};

/// A point closer than this to an edge end is linked to the end vertex
/// instead of splitting the edge, meters
const SNAP_TO_VERTEX_DISTANCE: f64 = 1.0;

/// Arena of temporary vertices and edges created while resolving the
/// endpoints of one request.
///
/// Temporary ids index into the arena, so they are only meaningful together
/// with the scope that issued them. Dropping the scope discards everything.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    corner_counter: u32,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        match id {
            VertexId::Temporary(idx) => self.vertices.get(idx as usize),
            VertexId::Permanent(_) => None,
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        match id {
            EdgeId::Temporary(idx) => self.edges.get(idx as usize),
            EdgeId::Permanent(_) => None,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn street_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.street().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    fn add_vertex(&mut self, label: String, name: String, coordinate: Coord<f64>, kind: VertexKind) -> VertexId {
        let id = VertexId::Temporary(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            label,
            name,
            coordinate,
            kind,
        });
        id
    }

    /// Adds an edge touching `location` and records it in the location's
    /// extra edges
    fn add_edge(&mut self, location: VertexId, from: VertexId, to: VertexId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId::Temporary(self.edges.len() as u32);
        self.edges.push(Edge { id, from, to, kind });
        if let Some(Vertex {
            kind: VertexKind::StreetLocation { extra, .. },
            ..
        }) = self.vertex_mut(location)
        {
            extra.push(id);
        }
        id
    }

    fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        match id {
            VertexId::Temporary(idx) => self.vertices.get_mut(idx as usize),
            VertexId::Permanent(_) => None,
        }
    }

    fn coordinate_of(&self, graph: &StreetGraph, id: VertexId) -> Option<Coord<f64>> {
        match id {
            VertexId::Permanent(idx) => graph.vertex(idx).map(|v| v.coordinate),
            VertexId::Temporary(_) => self.vertex(id).map(|v| v.coordinate),
        }
    }

    /// Street location standing in for an intersection, joined to it by a
    /// free edge in each direction
    pub fn create_corner_location(
        &mut self,
        intersection: VertexId,
        coordinate: Coord<f64>,
        name: impl Into<String>,
        wheelchair_accessible: bool,
    ) -> VertexId {
        let label = format!("corner {}", self.corner_counter);
        self.corner_counter += 1;
        let location = self.add_vertex(
            label,
            name.into(),
            coordinate,
            VertexKind::StreetLocation {
                wheelchair_accessible,
                extra: Vec::new(),
            },
        );
        self.add_edge(location, location, intersection, EdgeKind::Free);
        self.add_edge(location, intersection, location, EdgeKind::Free);
        location
    }

    /// Street location at `nearest_point` on each of `edges`, typically the
    /// two directions of one street.
    ///
    /// Edges whose end lies within a meter of the point get free edges to
    /// that end vertex. The others are split in two: a partial edge from
    /// the edge's start to the location and one from the location to its
    /// end, with lengths in proportion to the split geometry.
    pub fn create_street_location(
        &mut self,
        graph: &StreetGraph,
        label: impl Into<String>,
        name: impl Into<String>,
        edges: &[Edge],
        nearest_point: Coord<f64>,
        coordinate: Coord<f64>,
    ) -> VertexId {
        let wheelchair_accessible = edges
            .iter()
            .filter_map(Edge::street)
            .any(|street| street.wheelchair_accessible);
        let location = self.add_vertex(
            label.into(),
            name.into(),
            coordinate,
            VertexKind::StreetLocation {
                wheelchair_accessible,
                extra: Vec::new(),
            },
        );

        for edge in edges {
            let Some(street) = edge.street() else {
                trace!("Not splitting non-street edge {}", edge.id);
                continue;
            };
            let near_from = self
                .coordinate_of(graph, edge.from)
                .is_some_and(|c| distance(c, nearest_point) < SNAP_TO_VERTEX_DISTANCE);
            let near_to = self
                .coordinate_of(graph, edge.to)
                .is_some_and(|c| distance(c, nearest_point) < SNAP_TO_VERTEX_DISTANCE);

            if near_from || near_to {
                let end = if near_from { edge.from } else { edge.to };
                self.add_edge(location, location, end, EdgeKind::Free);
                self.add_edge(location, end, location, EdgeKind::Free);
                continue;
            }

            let Some(projection) = project_onto_line(&street.geometry, nearest_point) else {
                debug!("Edge {} has no segment to split", edge.id);
                continue;
            };
            let (head, tail) = split_line_at(&street.geometry, &projection);
            let total = line_length(&street.geometry);
            let ratio = if total > 0.0 {
                line_length(&head) / total
            } else {
                0.0
            };
            let length_in = street.length * ratio;
            let parent = street.parent.unwrap_or(edge.id);

            let inbound = street.partial(head, 0.0, length_in, parent, false);
            let outbound = street.partial(tail, length_in, street.length, parent, true);
            self.add_edge(location, edge.from, location, EdgeKind::Street(inbound));
            self.add_edge(location, location, edge.to, EdgeKind::Street(outbound));
        }
        location
    }

    /// Links a street location to a transit stop in both directions.
    /// `None` if `location` is not a street location of this scope.
    pub fn add_extra_edge_to(&mut self, location: VertexId, stop: VertexId) -> Option<(EdgeId, EdgeId)> {
        if !matches!(
            self.vertex(location).map(|v| &v.kind),
            Some(VertexKind::StreetLocation { .. })
        ) {
            return None;
        }
        let to_stop = self.add_edge(location, location, stop, EdgeKind::TransitLink);
        let from_stop = self.add_edge(location, stop, location, EdgeKind::TransitLink);
        Some((to_stop, from_stop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    #[test]
    fn test_split_lengths_add_up() {
        let fixture = test_fixtures::grid();
        let graph = &fixture.graph;
        let (forward, backward) = fixture.street_pair("0_0", "1_0");
        let original = forward.street().unwrap().length;
        let point = Coord { x: 0.0003, y: 0.0 };

        let mut scope = RequestScope::new();
        let location = scope.create_street_location(
            graph,
            "0th Street_test",
            "0th Street",
            &[forward.clone(), backward.clone()],
            point,
            Coord { x: 0.0003, y: 0.0001 },
        );

        let vertex = scope.vertex(location).unwrap();
        assert_eq!(vertex.coordinate, Coord { x: 0.0003, y: 0.0001 });
        assert_eq!(vertex.extra_edges().len(), 4);
        assert_eq!(scope.street_edges().count(), 4);

        let halves: Vec<&Edge> = scope
            .street_edges()
            .filter(|e| e.street().unwrap().parent == Some(forward.id))
            .collect();
        assert_eq!(halves.len(), 2);
        let total: f64 = halves.iter().map(|e| e.distance()).sum();
        assert!((total - original).abs() < 1e-9);
        // cut at 30% of the way along
        assert!((halves[0].distance() - 0.3 * original).abs() < 0.01);
        assert_eq!(halves[0].from, forward.from);
        assert_eq!(halves[0].to, location);
        assert_eq!(halves[1].to, forward.to);
    }

    #[test]
    fn test_point_at_end_links_to_vertex() {
        let fixture = test_fixtures::grid();
        let (forward, backward) = fixture.street_pair("0_0", "1_0");
        let at_corner = Coord { x: 0.001, y: 0.0 };

        let mut scope = RequestScope::new();
        let location = scope.create_street_location(
            &fixture.graph,
            "label",
            "name",
            &[forward.clone(), backward.clone()],
            at_corner,
            at_corner,
        );

        assert_eq!(scope.street_edges().count(), 0);
        let corner = fixture.graph.vertex_by_label("1_0").unwrap().id;
        let free: Vec<&Edge> = scope
            .edges()
            .iter()
            .filter(|e| matches!(e.kind, EdgeKind::Free))
            .collect();
        // both directions of the street end at 1_0, one pair of free edges each
        assert_eq!(free.len(), 4);
        assert!(free.iter().all(|e| e.from == corner || e.to == corner));
        assert!(free.iter().all(|e| e.from == location || e.to == location));
    }

    #[test]
    fn test_split_of_split_keeps_root_parent() {
        let fixture = test_fixtures::grid();
        let (forward, _) = fixture.street_pair("0_0", "1_0");

        let mut scope = RequestScope::new();
        scope.create_street_location(
            &fixture.graph,
            "first",
            "first",
            std::slice::from_ref(forward),
            Coord { x: 0.0005, y: 0.0 },
            Coord { x: 0.0005, y: 0.0 },
        );
        let first_half = scope.street_edges().next().unwrap().clone();
        scope.create_street_location(
            &fixture.graph,
            "second",
            "second",
            &[first_half],
            Coord { x: 0.0002, y: 0.0 },
            Coord { x: 0.0002, y: 0.0 },
        );
        assert!(
            scope
                .street_edges()
                .all(|e| e.street().unwrap().parent == Some(forward.id))
        );
    }

    #[test]
    fn test_corner_labels_are_sequential() {
        let fixture = test_fixtures::grid();
        let corner = fixture.graph.vertex_by_label("1_1").unwrap();
        let mut scope = RequestScope::new();
        let a = scope.create_corner_location(corner.id, corner.coordinate, "A", true);
        let b = scope.create_corner_location(corner.id, corner.coordinate, "B", true);
        assert_eq!(scope.vertex(a).unwrap().label, "corner 0");
        assert_eq!(scope.vertex(b).unwrap().label, "corner 1");
        assert_eq!(scope.vertex(a).unwrap().extra_edges().len(), 2);
    }

    #[test]
    fn test_transit_links_need_a_street_location() {
        let fixture = test_fixtures::grid();
        let corner = fixture.graph.vertex_by_label("1_1").unwrap();
        let mut scope = RequestScope::new();
        assert!(scope.add_extra_edge_to(corner.id, fixture.stop).is_none());

        let location = scope.create_corner_location(corner.id, corner.coordinate, "A", true);
        let (to_stop, from_stop) = scope.add_extra_edge_to(location, fixture.stop).unwrap();
        assert_eq!(scope.edge(to_stop).unwrap().to, fixture.stop);
        assert_eq!(scope.edge(from_stop).unwrap().from, fixture.stop);
        assert!(scope.vertex(location).unwrap().extra_edges().contains(&to_stop));
    }
}
