//! Delay for passing through an intersection between two street edges

use crate::model::{StreetEdge, TraverseMode, Vertex, VertexKind};
use crate::routing::RoutingRequest;

/// Seconds spent crossing `vertex` from `from` onto `to`
pub trait IntersectionTraversalCostModel: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn compute_traversal_cost(
        &self,
        vertex: &Vertex,
        from: &StreetEdge,
        to: &StreetEdge,
        mode: TraverseMode,
        request: &RoutingRequest,
        from_speed: f64,
        to_speed: f64,
    ) -> f64;
}

/// Fixed delays per turn direction for cars, turn-angle based costs for
/// everyone else
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleIntersectionTraversalCostModel {
    pub min_right_turn_angle: i32,
    pub max_right_turn_angle: i32,
    pub min_left_turn_angle: i32,
    pub max_left_turn_angle: i32,
    pub expected_right_at_light: f64,
    pub expected_straight_at_light: f64,
    pub expected_left_at_light: f64,
    pub expected_right_no_light: f64,
    pub expected_straight_no_light: f64,
    pub expected_left_no_light: f64,
    /// Both streets faster than this (m/s) means a junction without stops
    pub highway_speed: f64,
    /// Seconds of turning per degree, scaled by speed for non-drivers
    pub non_driving_turn_factor: f64,
}

impl Default for SimpleIntersectionTraversalCostModel {
    fn default() -> Self {
        Self {
            min_right_turn_angle: 45,
            max_right_turn_angle: 135,
            min_left_turn_angle: 225,
            max_left_turn_angle: 315,
            expected_right_at_light: 15.0,
            expected_straight_at_light: 15.0,
            expected_left_at_light: 15.0,
            expected_right_no_light: 8.0,
            expected_straight_no_light: 5.0,
            expected_left_no_light: 8.0,
            highway_speed: 25.0,
            non_driving_turn_factor: 1.0 / 20.0,
        }
    }
}

impl SimpleIntersectionTraversalCostModel {
    /// Clockwise turn in degrees, mirrored for left-hand traffic
    fn turn_angle(from: &StreetEdge, to: &StreetEdge, request: &RoutingRequest) -> i32 {
        let mut angle = to.in_angle - from.out_angle;
        if angle < 0 {
            angle += 360;
        }
        if request.drive_on_right {
            angle
        } else {
            360 - angle
        }
    }

    fn is_right_turn(&self, angle: i32) -> bool {
        (self.min_right_turn_angle..=self.max_right_turn_angle).contains(&angle)
    }

    fn is_left_turn(&self, angle: i32) -> bool {
        (self.min_left_turn_angle..=self.max_left_turn_angle).contains(&angle)
    }

    fn driving_cost(
        &self,
        traffic_light: bool,
        from: &StreetEdge,
        to: &StreetEdge,
        request: &RoutingRequest,
    ) -> f64 {
        let angle = Self::turn_angle(from, to, request);
        if traffic_light {
            return if self.is_right_turn(angle) {
                self.expected_right_at_light
            } else if self.is_left_turn(angle) {
                self.expected_left_at_light
            } else {
                self.expected_straight_at_light
            };
        }
        if from.car_speed > self.highway_speed && to.car_speed > self.highway_speed {
            return 0.0;
        }
        if self.is_right_turn(angle) {
            self.expected_right_no_light
        } else if self.is_left_turn(angle) {
            self.expected_left_no_light
        } else {
            self.expected_straight_no_light
        }
    }

    fn non_driving_cost(&self, from: &StreetEdge, to: &StreetEdge, to_speed: f64) -> f64 {
        let mut turn = (to.out_angle - from.in_angle).abs();
        if turn > 180 {
            turn = 360 - turn;
        }
        f64::from(turn) * self.non_driving_turn_factor / to_speed
    }
}

impl IntersectionTraversalCostModel for SimpleIntersectionTraversalCostModel {
    fn compute_traversal_cost(
        &self,
        vertex: &Vertex,
        from: &StreetEdge,
        to: &StreetEdge,
        mode: TraverseMode,
        request: &RoutingRequest,
        _from_speed: f64,
        to_speed: f64,
    ) -> f64 {
        let traffic_light = match vertex.kind {
            VertexKind::Intersection {
                free_flowing: true, ..
            } => return 0.0,
            VertexKind::Intersection { traffic_light, .. } => traffic_light,
            _ => false,
        };
        if mode.is_driving() {
            self.driving_cost(traffic_light, from, to, request)
        } else {
            self.non_driving_cost(from, to, to_speed)
        }
    }
}
