//! Small street graphs shared by the unit tests

use std::sync::Arc;

use geo::{Coord, LineString, coord};

use crate::geometry::line_length;
use crate::linking::RequestScope;
use crate::model::{
    Edge, EdgeId, EdgeKind, PatternEdge, StreetEdge, StreetGraph, StreetTraversalPermission,
    VertexId, VertexKind,
};
use crate::routing::{RoutingContext, RoutingRequest};

/// Blocks are 0.001 degrees (about 111 m) on a side
const BLOCK: f64 = 0.001;

pub(crate) struct Fixture {
    pub graph: Arc<StreetGraph>,
    pub stop: VertexId,
    pub pattern_edge: EdgeId,
}

impl Fixture {
    pub fn from_graph(graph: StreetGraph) -> Self {
        let stop = graph.vertex_by_label("stop").map(|v| v.id);
        let pattern_edge = graph.edges().find(|e| e.is_pattern()).map(|e| e.id);
        Self {
            graph: Arc::new(graph),
            stop: stop.unwrap(),
            pattern_edge: pattern_edge.unwrap(),
        }
    }

    pub fn vertex_id(&self, label: &str) -> VertexId {
        self.graph.vertex_by_label(label).unwrap().id
    }

    /// The street edge from `a` to `b` and the one back
    pub fn street_pair(&self, a: &str, b: &str) -> (&Edge, &Edge) {
        let (a, b) = (self.vertex_id(a), self.vertex_id(b));
        let find = |from: VertexId, to: VertexId| {
            self.graph
                .edges()
                .find(|e| e.from == from && e.to == to && e.street().is_some())
                .unwrap()
        };
        (find(a, b), find(b, a))
    }

    pub fn context(&self, request: RoutingRequest) -> RoutingContext<'_> {
        RoutingContext::with_scope(&self.graph, request, RequestScope::new())
    }
}

fn intersection(traffic_light: bool) -> VertexKind {
    VertexKind::Intersection {
        traffic_light,
        free_flowing: false,
    }
}

fn stop_kind(stop_id: &str) -> VertexKind {
    VertexKind::TransitStop {
        stop_id: stop_id.to_string(),
        street_linkable: true,
        wheelchair_entrance: true,
    }
}

fn add_street(
    graph: &mut StreetGraph,
    a: &str,
    b: &str,
    name: &str,
    permission: StreetTraversalPermission,
) {
    let from = graph.vertex_by_label(a).unwrap();
    let to = graph.vertex_by_label(b).unwrap();
    let geometry = LineString::new(vec![from.coordinate, to.coordinate]);
    let (from, to) = (from.id, to.id);
    let length = line_length(&geometry);
    let street = StreetEdge::new(geometry, name, length, permission, false);
    graph.add_two_way_street(from, to, street).unwrap();
}

/// Two east-west streets crossed by three avenues:
///
/// ```text
///   0_1 --1st Street-- 1_1 --1st Street-- 2_1
///    |                  |        . stop    |
///    A                  B    path          C
///    |                  |                  |
///   0_0 --0th Street-- 1_0 --0th Street-- 2_0
/// ```
///
/// `label` is `x_y` in blocks. A footway runs north-south through the
/// eastern block, and a transit stop just north of 1st Street has a pattern
/// edge to a second stop.
pub(crate) fn grid() -> Fixture {
    let mut graph = StreetGraph::new();
    for x in 0..=2 {
        for y in 0..=1 {
            let label = format!("{x}_{y}");
            let coordinate = Coord {
                x: f64::from(x) * BLOCK,
                y: f64::from(y) * BLOCK,
            };
            let traffic_light = x == 1 && y == 0;
            graph
                .add_vertex(label.clone(), label, coordinate, intersection(traffic_light))
                .unwrap();
        }
    }
    graph
        .add_vertex("path_s", "", coord! { x: 0.0015, y: 0.0002 }, VertexKind::Street)
        .unwrap();
    graph
        .add_vertex("path_n", "", coord! { x: 0.0015, y: 0.0008 }, VertexKind::Street)
        .unwrap();
    let stop = graph
        .add_vertex("stop", "Main Stop", coord! { x: 0.0005, y: 0.0012 }, stop_kind("S1"))
        .unwrap();
    let next_stop = graph
        .add_vertex("stop2", "Next Stop", coord! { x: 0.0015, y: 0.0012 }, stop_kind("S2"))
        .unwrap();

    let all = StreetTraversalPermission::ALL;
    add_street(&mut graph, "0_0", "1_0", "0th Street", all);
    add_street(&mut graph, "1_0", "2_0", "0th Street", all);
    add_street(&mut graph, "0_1", "1_1", "1st Street", all);
    add_street(&mut graph, "1_1", "2_1", "1st Street", all);
    add_street(&mut graph, "0_0", "0_1", "A Avenue", all);
    add_street(&mut graph, "1_0", "1_1", "B Avenue", all);
    add_street(&mut graph, "2_0", "2_1", "C Avenue", all);
    add_street(
        &mut graph,
        "path_s",
        "path_n",
        "Park Path",
        StreetTraversalPermission::PEDESTRIAN,
    );

    graph
        .add_edge(
            stop,
            next_stop,
            EdgeKind::Pattern(PatternEdge {
                route_id: "R1".to_string(),
                geometry: Some(LineString::new(vec![
                    coord! { x: 0.0005, y: 0.0012 },
                    coord! { x: 0.0015, y: 0.0012 },
                ])),
            }),
        )
        .unwrap();

    Fixture::from_graph(graph)
}
