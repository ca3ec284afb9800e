//! The permanent street graph shared by all requests

use geo::Coord;
use hashbrown::HashMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use super::components::{Edge, EdgeId, EdgeKind, Vertex, VertexId, VertexKind};
use super::street_edge::StreetEdge;
use crate::Error;

/// Directed street graph with unique vertex labels.
///
/// Built once and then shared read-only; per-request additions go into a
/// [`crate::linking::RequestScope`] instead.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    graph: DiGraph<Vertex, Edge>,
    labels: HashMap<String, NodeIndex>,
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(
        &mut self,
        label: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coord<f64>,
        kind: VertexKind,
    ) -> Result<VertexId, Error> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(Error::DuplicateVertexLabel(label));
        }
        if let VertexKind::StreetLocation { .. } = kind {
            return Err(Error::InvalidGeometry(format!(
                "street location {label} cannot be added to the permanent graph"
            )));
        }
        let idx = self.graph.add_node(Vertex {
            id: VertexId::Temporary(0),
            label: label.clone(),
            name: name.into(),
            coordinate,
            kind,
        });
        let id = VertexId::Permanent(idx);
        self.graph[idx].id = id;
        self.labels.insert(label, idx);
        Ok(id)
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, kind: EdgeKind) -> Result<EdgeId, Error> {
        let (VertexId::Permanent(a), VertexId::Permanent(b)) = (from, to) else {
            return Err(Error::InvalidVertexIndex);
        };
        if self.graph.node_weight(a).is_none() || self.graph.node_weight(b).is_none() {
            return Err(Error::InvalidVertexIndex);
        }
        let idx = self.graph.add_edge(
            a,
            b,
            Edge {
                id: EdgeId::Temporary(0),
                from,
                to,
                kind,
            },
        );
        let id = EdgeId::Permanent(idx);
        self.graph[idx].id = id;
        Ok(id)
    }

    /// Adds a street edge in each direction between two vertices, the
    /// second one with reversed geometry and the `back` flag set.
    pub fn add_two_way_street(
        &mut self,
        a: VertexId,
        b: VertexId,
        street: StreetEdge,
    ) -> Result<(EdgeId, EdgeId), Error> {
        let mut geometry = street.geometry.clone();
        geometry.0.reverse();
        let mut back = StreetEdge::new(
            geometry,
            street.name.clone(),
            street.length,
            street.permission,
            true,
        );
        back.car_speed = street.car_speed;
        back.bicycle_safety_factor = street.bicycle_safety_factor;
        back.wheelchair_accessible = street.wheelchair_accessible;
        back.street_class = street.street_class;
        back.stairs = street.stairs;
        let forward = self.add_edge(a, b, EdgeKind::Street(street))?;
        let backward = self.add_edge(b, a, EdgeKind::Street(back))?;
        Ok((forward, backward))
    }

    pub fn vertex(&self, idx: NodeIndex) -> Option<&Vertex> {
        self.graph.node_weight(idx)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.graph.edge_weight(idx)
    }

    pub fn street_edge_mut(&mut self, id: EdgeId) -> Result<&mut StreetEdge, Error> {
        let EdgeId::Permanent(idx) = id else {
            return Err(Error::InvalidEdgeIndex);
        };
        self.graph
            .edge_weight_mut(idx)
            .ok_or(Error::InvalidEdgeIndex)?
            .street_mut()
            .ok_or(Error::NotAStreetEdge(id))
    }

    pub fn vertex_by_label(&self, label: &str) -> Option<&Vertex> {
        self.labels.get(label).and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Outgoing edges in insertion order
    pub fn outgoing(&self, idx: NodeIndex) -> impl Iterator<Item = &Edge> {
        self.adjacent(idx, Direction::Outgoing)
    }

    /// Incoming edges in insertion order
    pub fn incoming(&self, idx: NodeIndex) -> impl Iterator<Item = &Edge> {
        self.adjacent(idx, Direction::Incoming)
    }

    fn adjacent(&self, idx: NodeIndex, direction: Direction) -> impl Iterator<Item = &Edge> {
        // petgraph walks adjacency lists newest first
        let mut edges: Vec<&Edge> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| e.weight())
            .collect();
        edges.sort_unstable_by_key(|e| e.id);
        edges.into_iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn inner(&self) -> &DiGraph<Vertex, Edge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StreetTraversalPermission;
    use geo::{coord, line_string};

    #[test]
    fn test_labels_are_unique() {
        let mut graph = StreetGraph::new();
        graph
            .add_vertex("a", "A", coord! { x: 0.0, y: 0.0 }, VertexKind::Street)
            .unwrap();
        let err = graph
            .add_vertex("a", "A again", coord! { x: 1.0, y: 0.0 }, VertexKind::Street)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateVertexLabel(label) if label == "a"));
        assert_eq!(graph.vertex_by_label("a").unwrap().name, "A");
    }

    #[test]
    fn test_two_way_street() {
        let mut graph = StreetGraph::new();
        let a = graph
            .add_vertex("a", "A", coord! { x: 0.0, y: 0.0 }, VertexKind::Street)
            .unwrap();
        let b = graph
            .add_vertex("b", "B", coord! { x: 0.0, y: 0.001 }, VertexKind::Street)
            .unwrap();
        let street = StreetEdge::new(
            line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.001)],
            "Main",
            111.0,
            StreetTraversalPermission::ALL,
            false,
        );
        let (fwd, bwd) = graph.add_two_way_street(a, b, street).unwrap();
        let (EdgeId::Permanent(f), EdgeId::Permanent(r)) = (fwd, bwd) else {
            panic!("graph edges are permanent");
        };
        let forward = graph.edge(f).unwrap();
        let backward = graph.edge(r).unwrap();
        assert!(backward.street().unwrap().back);
        assert!(forward.is_reverse_of(backward));
        let VertexId::Permanent(a_idx) = a else { unreachable!() };
        assert_eq!(graph.outgoing(a_idx).count(), 1);
        assert_eq!(graph.incoming(a_idx).next().unwrap().id, bwd);
    }

    #[test]
    fn test_street_edge_mut_rejects_free_edges() {
        let mut graph = StreetGraph::new();
        let a = graph
            .add_vertex("a", "A", coord! { x: 0.0, y: 0.0 }, VertexKind::Street)
            .unwrap();
        let b = graph
            .add_vertex("b", "B", coord! { x: 0.0, y: 0.001 }, VertexKind::Street)
            .unwrap();
        let free = graph.add_edge(a, b, EdgeKind::Free).unwrap();
        assert!(matches!(graph.street_edge_mut(free), Err(Error::NotAStreetEdge(_))));
        assert!(matches!(
            graph.add_edge(a, VertexId::Temporary(0), EdgeKind::Free),
            Err(Error::InvalidVertexIndex)
        ));
    }
}
