use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::{LineString, coord};
use streetlink_core::geometry::line_length;
use streetlink_core::prelude::*;

const SIZE: u32 = 40;
const BLOCK: f64 = 0.001;

/// SIZE x SIZE grid of two-way streets
fn city() -> Arc<StreetGraph> {
    let mut graph = StreetGraph::new();
    let mut ids = Vec::new();
    for x in 0..SIZE {
        for y in 0..SIZE {
            let coordinate = coord! { x: f64::from(x) * BLOCK, y: f64::from(y) * BLOCK };
            let id = graph
                .add_vertex(
                    format!("{x}_{y}"),
                    "",
                    coordinate,
                    VertexKind::Intersection {
                        traffic_light: (x + y) % 4 == 0,
                        free_flowing: false,
                    },
                )
                .unwrap();
            ids.push((id, coordinate));
        }
    }
    let at = |x: u32, y: u32| ids[(x * SIZE + y) as usize];
    for x in 0..SIZE {
        for y in 0..SIZE {
            let (a, a_coord) = at(x, y);
            let mut neighbours = Vec::new();
            if x + 1 < SIZE {
                neighbours.push((at(x + 1, y), format!("Street {y}")));
            }
            if y + 1 < SIZE {
                neighbours.push((at(x, y + 1), format!("Avenue {x}")));
            }
            for ((b, b_coord), name) in neighbours {
                let geometry = LineString::new(vec![a_coord, b_coord]);
                let length = line_length(&geometry);
                let street = StreetEdge::new(geometry, name, length, StreetTraversalPermission::ALL, false);
                graph.add_two_way_street(a, b, street).unwrap();
            }
        }
    }
    Arc::new(graph)
}

fn bench_closest_edges(c: &mut Criterion) {
    let graph = city();
    let index = StreetVertexIndex::new(Arc::clone(&graph));
    let requirements = TraversalRequirements::from(&RoutingRequest::new(TraverseMode::Walk.into()));
    let scope = RequestScope::new();
    let location = GenericLocation::from_lat_lon(0.01234, 0.02345);

    c.bench_function("closest_edges", |b| {
        b.iter(|| {
            index.closest_edges(
                black_box(&location),
                &requirements,
                &scope,
                &[],
                &[],
                false,
            )
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let index = StreetVertexIndex::new(city());
    let request = RoutingRequest::new(TraverseMode::Walk.into());
    let location = GenericLocation::from_lat_lon(0.01234, 0.02345);

    c.bench_function("resolve_mid_block", |b| {
        b.iter(|| {
            let mut scope = RequestScope::new();
            index.resolve(black_box(&location), &request, &mut scope, None)
        });
    });
}

fn bench_traverse(c: &mut Criterion) {
    let index = StreetVertexIndex::new(city());
    let request = RoutingRequest::new(TraverseMode::Bicycle.into());
    let ctx = RoutingContext::new(
        &index,
        request,
        &GenericLocation::from_lat_lon(0.0102, 0.0105),
        &GenericLocation::from_place("20_20"),
    )
    .unwrap();

    c.bench_function("traverse_two_edges", |b| {
        b.iter(|| {
            let origin = ctx.from_vertex().unwrap();
            let start = State::new(origin, &ctx);
            let mut reached = 0;
            for edge in ctx.outgoing(origin) {
                for state in edge.traverse(&start) {
                    for next in ctx.outgoing(state.vertex()) {
                        reached += next.traverse(&state).len();
                    }
                }
            }
            black_box(reached)
        });
    });
}

criterion_group!(benches, bench_closest_edges, bench_resolve, bench_traverse);
criterion_main!(benches);
