use std::sync::Arc;

use geo::{LineString, coord};
use streetlink_core::geometry::line_length;
use streetlink_core::prelude::*;

/// Two parallel east-west streets, 0.001 degrees apart, joined at both ends
fn ladder() -> Arc<StreetGraph> {
    let mut graph = StreetGraph::new();
    let corners = [
        ("sw", 0.0, 0.0),
        ("se", 0.002, 0.0),
        ("nw", 0.0, 0.001),
        ("ne", 0.002, 0.001),
    ];
    for (label, x, y) in corners {
        graph
            .add_vertex(
                label,
                label,
                coord! { x: x, y: y },
                VertexKind::Intersection {
                    traffic_light: false,
                    free_flowing: false,
                },
            )
            .unwrap();
    }
    let streets = [
        ("sw", "se", "South Street", StreetTraversalPermission::ALL),
        ("nw", "ne", "North Street", StreetTraversalPermission::PEDESTRIAN),
        ("sw", "nw", "West Lane", StreetTraversalPermission::ALL),
        ("se", "ne", "East Lane", StreetTraversalPermission::ALL),
    ];
    for (a, b, name, permission) in streets {
        let from = graph.vertex_by_label(a).unwrap();
        let to = graph.vertex_by_label(b).unwrap();
        let geometry = LineString::new(vec![from.coordinate, to.coordinate]);
        let (from, to) = (from.id, to.id);
        let length = line_length(&geometry);
        graph
            .add_two_way_street(from, to, StreetEdge::new(geometry, name, length, permission, false))
            .unwrap();
    }
    Arc::new(graph)
}

/// Crosses every edge leaving the origin and returns the states that reach
/// the end of a split half
fn walk_out<'a>(ctx: &'a RoutingContext<'a>) -> Vec<Arc<State<'a>>> {
    let origin = ctx.from_vertex().unwrap();
    let start = State::new(origin, ctx);
    ctx.outgoing(origin)
        .into_iter()
        .flat_map(|edge| edge.traverse(&start))
        .collect()
}

#[test]
fn test_mid_block_origin_walks_to_both_corners() {
    let index = StreetVertexIndex::new(ladder());
    let request = RoutingRequest::new(TraverseMode::Walk.into());
    let ctx = RoutingContext::new(
        &index,
        request,
        &GenericLocation::from_lat_lon(0.00005, 0.0005),
        &GenericLocation::from_place("ne"),
    )
    .unwrap();

    let states = walk_out(&ctx);
    assert_eq!(states.len(), 2);

    let sw = index.graph().vertex_by_label("sw").unwrap().id;
    let se = index.graph().vertex_by_label("se").unwrap().id;
    let west = states.iter().find(|s| s.vertex() == sw).unwrap();
    let east = states.iter().find(|s| s.vertex() == se).unwrap();

    // a quarter of the block lies west of the origin
    assert!((east.walk_distance() / west.walk_distance() - 3.0).abs() < 0.01);
    assert!(east.weight() > west.weight());
    assert!(east.time() > west.time());
    assert!(states.iter().all(|s| s.back_mode() == Some(TraverseMode::Walk)));
}

#[test]
fn test_car_request_skips_pedestrian_street() {
    let index = StreetVertexIndex::new(ladder());
    // the point is nearer North Street, which cars may not use
    let point = GenericLocation::from_lat_lon(0.0009, 0.001);

    let walk = RoutingRequest::new(TraverseMode::Walk.into());
    let mut scope = RequestScope::new();
    index.resolve(&point, &walk, &mut scope, None).unwrap();
    assert!(scope.street_edges().all(|e| e.name() == "North Street"));

    let drive = RoutingRequest::new(TraverseMode::Car.into());
    let mut scope = RequestScope::new();
    index.resolve(&point, &drive, &mut scope, None).unwrap();
    assert!(scope.street_edges().all(|e| e.name() == "South Street"));
}

#[test]
fn test_origin_at_corner_uses_intersection_name() {
    let index = StreetVertexIndex::new(ladder());
    let request = RoutingRequest::new(TraverseMode::Walk.into());
    let mut scope = RequestScope::new();
    let corner = index
        .resolve(
            &GenericLocation::from_lat_lon(0.00001, 0.00001),
            &request,
            &mut scope,
            None,
        )
        .unwrap();
    let vertex = scope.vertex(corner).unwrap();
    assert_eq!(vertex.name, "South Street & West Lane");
}

#[test]
fn test_request_options_from_json() {
    let request = RoutingRequest::from_json(
        r#"{ "walk_speed": 1.0, "max_walk_distance": 500.0, "optimize": "SAFE" }"#,
    )
    .unwrap();
    assert_eq!(request.walk_speed, 1.0);
    assert_eq!(request.optimize, OptimizeType::Safe);
    assert!(request.drive_on_right);

    let invalid = RoutingRequest::from_json(r#"{ "walk_speed": -1.0 }"#);
    assert!(matches!(invalid, Err(Error::InvalidConfig(_))));
}
