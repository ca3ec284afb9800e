//! Resolving trip endpoints to graph vertices

use log::debug;

use super::naming::corner_name;
use super::scope::RequestScope;
use crate::geometry::distance;
use crate::index::StreetVertexIndex;
use crate::model::{Edge, GenericLocation, VertexId};
use crate::routing::{RoutingRequest, TraversalRequirements};

impl StreetVertexIndex {
    /// Vertex to start or end a search at for `location`.
    ///
    /// Locations without a coordinate are looked up by their `place` label.
    /// Coordinates next to an intersection become a corner location on it,
    /// anything else is split into the closest street. New vertices and
    /// edges go into `scope`. `other` is the already resolved opposite
    /// endpoint, whose temporary edges are then also considered so that both
    /// ends can sit on the same street segment.
    pub fn resolve(
        &self,
        location: &GenericLocation,
        request: &RoutingRequest,
        scope: &mut RequestScope,
        other: Option<VertexId>,
    ) -> Option<VertexId> {
        let Some(coord) = location.coordinate else {
            let place = location.place.as_deref()?;
            return self.graph().vertex_by_label(place).map(|v| v.id);
        };

        let extra_edges = other
            .and_then(|id| scope.vertex(id))
            .map(|v| v.extra_edges().to_vec())
            .unwrap_or_default();
        let requirements = TraversalRequirements::from(request);

        if let Some(corner) = self.resolve_corner(location, request, &requirements, scope) {
            return Some(corner);
        }

        let closest_stop = if request.modes.is_transit() {
            self.nearby_transit_stops(coord, self.config().stop_search_radius)
                .into_iter()
                .filter(|stop| stop.is_street_linkable())
                .map(|stop| (stop.id, distance(coord, stop.coordinate)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
        } else {
            None
        };

        let closest_street = self
            .closest_edges(location, &requirements, scope, &extra_edges, &[], false)
            .map(|bundle| {
                let best = bundle.best();
                let edges: Vec<Edge> = bundle.to_edge_list().into_iter().cloned().collect();
                (edges, best.nearest_point, best.street.name.clone())
            });

        let Some((edges, nearest_point, street_name)) = closest_street else {
            debug!("No street near {location}, falling back to stop {closest_stop:?}");
            return closest_stop.map(|(stop, _)| stop);
        };

        let street_distance = distance(coord, nearest_point);
        let label = format!("{street_name}_{location}");
        let name = match &location.name {
            Some(name) if location.has_name() => name.clone(),
            _ => street_name,
        };
        debug!("Splitting {} edges at {label} ({street_distance:.1} m away)", edges.len());
        let street_location =
            scope.create_street_location(self.graph(), label, name, &edges, nearest_point, coord);

        if let Some((stop, stop_distance)) = closest_stop {
            let relative_stop_distance = stop_distance / street_distance;
            if relative_stop_distance < self.config().stop_distance_ratio {
                debug!("Linking {location} to nearby stop {stop:?}");
                scope.add_extra_edge_to(street_location, stop);
            }
        }
        Some(street_location)
    }

    /// Corner location when `location` is within the corner distance of an
    /// intersection that has a usable street
    fn resolve_corner(
        &self,
        location: &GenericLocation,
        request: &RoutingRequest,
        requirements: &TraversalRequirements,
        scope: &mut RequestScope,
    ) -> Option<VertexId> {
        let coord = location.coordinate?;
        let intersection = self.nearest_intersection(coord)?;
        let VertexId::Permanent(idx) = intersection.id else {
            return None;
        };
        let graph = self.graph();

        let usable = if request.arrive_by {
            graph
                .incoming(idx)
                .filter_map(Edge::street)
                .any(|s| requirements.can_be_traversed(s))
        } else {
            graph
                .outgoing(idx)
                .filter_map(Edge::street)
                .any(|s| requirements.can_be_traversed(s))
        };
        if !usable {
            debug!("Intersection {} has no usable street", intersection.label);
            return None;
        }

        let name = match &location.name {
            Some(name) if location.has_name() => name.clone(),
            _ => corner_name(
                self.namer.as_ref(),
                graph.outgoing(idx).filter(|e| e.street().is_some()).map(Edge::name),
                &request.locale,
            ),
        };
        let wheelchair_accessible = graph
            .outgoing(idx)
            .filter_map(Edge::street)
            .any(|s| s.wheelchair_accessible);

        debug!("{location} is at intersection {}", intersection.label);
        Some(scope.create_corner_location(intersection.id, coord, name, wheelchair_accessible))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo::coord;

    use super::*;
    use crate::model::{EdgeKind, StreetGraph, TraverseMode, TraverseModeSet, VertexKind};
    use crate::test_fixtures;

    fn walk_request() -> RoutingRequest {
        RoutingRequest::new(TraverseMode::Walk.into())
    }

    #[test]
    fn test_place_label_lookup() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let found = index.resolve(
            &GenericLocation::from_place("1_0"),
            &walk_request(),
            &mut scope,
            None,
        );
        assert_eq!(found, fixture.graph.vertex_by_label("1_0").map(|v| v.id));
        assert!(
            index
                .resolve(&GenericLocation::from_place("nowhere"), &walk_request(), &mut scope, None)
                .is_none()
        );
        assert!(
            index
                .resolve(&GenericLocation::default(), &walk_request(), &mut scope, None)
                .is_none()
        );
        assert!(scope.is_empty());
    }

    #[test]
    fn test_far_away_location_is_not_found() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let far = GenericLocation::from_lat_lon(0.5, 0.5);
        assert!(index.resolve(&far, &walk_request(), &mut scope, None).is_none());
        assert!(scope.is_empty());
    }

    #[test]
    fn test_corner_location_gets_street_names() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let near_corner = GenericLocation::from_lat_lon(0.001, 0.00102);

        let id = index
            .resolve(&near_corner, &walk_request(), &mut scope, None)
            .unwrap();
        let vertex = scope.vertex(id).unwrap();
        assert_eq!(vertex.label, "corner 0");
        assert_eq!(vertex.name, "1st Street & B Avenue");
        assert_eq!(vertex.coordinate, coord! { x: 0.00102, y: 0.001 });

        let intersection = fixture.graph.vertex_by_label("1_1").unwrap().id;
        let free: Vec<&Edge> = vertex
            .extra_edges()
            .iter()
            .filter_map(|e| scope.edge(*e))
            .collect();
        assert_eq!(free.len(), 2);
        assert!(free.iter().any(|e| e.from == id && e.to == intersection));
        assert!(free.iter().any(|e| e.from == intersection && e.to == id));
    }

    #[test]
    fn test_given_name_wins() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let home = GenericLocation::from_lat_lon(0.001, 0.00102).with_name("Home");
        let id = index.resolve(&home, &walk_request(), &mut scope, None).unwrap();
        assert_eq!(scope.vertex(id).unwrap().name, "Home");
    }

    #[test]
    fn test_mid_block_location_splits_the_street() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let location = GenericLocation::from_lat_lon(0.0001, 0.0003);

        let id = index.resolve(&location, &walk_request(), &mut scope, None).unwrap();
        let vertex = scope.vertex(id).unwrap();
        assert_eq!(vertex.label, format!("0th Street_{location}"));
        assert_eq!(vertex.name, "0th Street");
        assert!(matches!(
            vertex.kind,
            VertexKind::StreetLocation {
                wheelchair_accessible: true,
                ..
            }
        ));
        // two directions, each split in two
        assert_eq!(scope.street_edges().count(), 4);
    }

    #[test]
    fn test_second_endpoint_sees_first_endpoint_edges() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let request = walk_request();

        let from = index
            .resolve(&GenericLocation::from_lat_lon(0.0001, 0.0003), &request, &mut scope, None)
            .unwrap();
        let to = index
            .resolve(
                &GenericLocation::from_lat_lon(0.0001, 0.0007),
                &request,
                &mut scope,
                Some(from),
            )
            .unwrap();

        // the destination splits a half created for the origin
        let from_edges = scope.vertex(from).unwrap().extra_edges().to_vec();
        let to_vertex = scope.vertex(to).unwrap();
        assert!(to_vertex.extra_edges().iter().any(|id| {
            let edge = scope.edge(*id).unwrap();
            edge.from == from || edge.to == from
        }));
        assert!(!from_edges.is_empty());
    }

    #[test]
    fn test_nearby_stop_gets_linked() {
        let fixture = test_fixtures::grid();
        let index = StreetVertexIndex::new(Arc::clone(&fixture.graph));
        let mut scope = RequestScope::new();
        let request = RoutingRequest::default();
        let stop = fixture.graph.vertex_by_label("stop").unwrap();
        let at_stop = GenericLocation::from_lat_lon(stop.coordinate.y, stop.coordinate.x);

        let id = index.resolve(&at_stop, &request, &mut scope, None).unwrap();
        let links: Vec<&Edge> = scope
            .vertex(id)
            .unwrap()
            .extra_edges()
            .iter()
            .filter_map(|e| scope.edge(*e))
            .filter(|e| matches!(e.kind, EdgeKind::TransitLink))
            .collect();
        assert_eq!(links.len(), 2);
        assert!(links.iter().any(|e| e.to == fixture.stop));

        // walking only, the stop is ignored
        let mut walk_scope = RequestScope::new();
        let id = index.resolve(&at_stop, &walk_request(), &mut walk_scope, None).unwrap();
        assert!(
            walk_scope
                .vertex(id)
                .unwrap()
                .extra_edges()
                .iter()
                .all(|e| !matches!(walk_scope.edge(*e).unwrap().kind, EdgeKind::TransitLink))
        );
    }

    #[test]
    fn test_falls_back_to_stop_without_streets() {
        let mut graph = StreetGraph::new();
        let stop = graph
            .add_vertex(
                "lonely",
                "Lonely Stop",
                coord! { x: 10.0, y: 10.0 },
                VertexKind::TransitStop {
                    stop_id: "L1".to_string(),
                    street_linkable: true,
                    wheelchair_entrance: false,
                },
            )
            .unwrap();
        let index = StreetVertexIndex::new(Arc::new(graph));
        let mut scope = RequestScope::new();
        let request = RoutingRequest::new(TraverseModeSet::walk_and_transit());
        let near = GenericLocation::from_lat_lon(10.001, 10.0);
        assert_eq!(index.resolve(&near, &request, &mut scope, None), Some(stop));
        assert!(index.resolve(&near, &walk_request(), &mut scope, None).is_none());
    }
}
