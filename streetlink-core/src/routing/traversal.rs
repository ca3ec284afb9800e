//! Crossing a single edge: feasibility, time and weight.
//!
//! Street edges carry the full model: mode fallback when a bicycle has to be
//! walked, slope and safety weighting, turn restrictions and intersection
//! delays, walk and pre-transit limits, and the kiss-and-ride mode switch.

use std::sync::Arc;

use log::{debug, trace};

use crate::Time;
use crate::model::{
    Edge, EdgeKind, StreetEdge, TraverseMode, TurnRestrictionKind, WALK_COST_SPEED, walk_cost,
};
use crate::routing::{OptimizeType, RoutingRequest, State, StateEditor};

/// GREENWAYS discounts edges at least this safe
const GREENWAY_SAFETY_FACTOR: f64 = 0.1;
const GREENWAY_DISCOUNT: f64 = 0.66;
/// Turn cost seconds that count as one meter of walking, for tie breaking
const TURN_COST_PER_WALK_METER: f64 = 100.0;

/// Extra weight for a step that takes a value from `prev` to `new` past
/// `limit`. The fixed `penalty` is only charged on the step that crosses the
/// limit; every unit beyond it costs `rate`.
pub fn overage_penalty(prev: f64, new: f64, limit: f64, penalty: f64, rate: f64) -> f64 {
    if prev <= limit && new > limit {
        rate * (new - limit) + penalty
    } else {
        rate * (new - prev)
    }
}

impl StreetEdge {
    fn is_wheelchair_blocked(&self, request: &RoutingRequest) -> bool {
        request.wheelchair_accessible
            && (!self.wheelchair_accessible || self.elevation.max_slope() > request.max_slope)
    }

    /// Some requested mode may use this edge
    pub fn can_traverse(&self, request: &RoutingRequest) -> bool {
        !self.is_wheelchair_blocked(request) && self.permission.allows_any(&request.modes)
    }

    pub fn can_traverse_mode(&self, request: &RoutingRequest, mode: TraverseMode) -> bool {
        !self.is_wheelchair_blocked(request) && self.permission.allows(mode)
    }

    /// Meters per second on this edge. `None` for modes without a street
    /// speed.
    pub fn calculate_speed(&self, request: &RoutingRequest, mode: TraverseMode) -> Option<f64> {
        if mode.is_driving() {
            Some(self.car_speed)
        } else {
            request.speed(mode)
        }
    }

    /// False when a turn restriction active at `time` for `mode` forbids
    /// continuing from this edge onto `next`
    pub fn can_turn_onto(&self, next: &Edge, time: Time, mode: TraverseMode) -> bool {
        !self.turn_restrictions.iter().any(|r| {
            let applies = r.modes.contains(mode) && r.is_active(time);
            match r.kind {
                TurnRestrictionKind::OnlyTurn => applies && !next.is_equivalent_to(r.to),
                TurnRestrictionKind::NoTurn => applies && next.is_equivalent_to(r.to),
            }
        })
    }

    /// Fastest possible crossing time, seconds
    pub fn time_lower_bound(&self, request: &RoutingRequest) -> f64 {
        self.length / request.street_speed_upper_bound()
    }

    pub fn weight_lower_bound(&self, request: &RoutingRequest) -> f64 {
        self.time_lower_bound(request) * request.walk_reluctance
    }

    /// Time and weight for covering the edge's length, before turns
    fn base_cost(&self, request: &RoutingRequest, mode: TraverseMode, speed: f64) -> (f64, f64) {
        let length = self.length;
        let slope_speed_length = self.slope_speed_effective_length();

        if request.wheelchair_accessible {
            let weight = slope_speed_length / speed;
            return (weight, weight);
        }

        if mode == TraverseMode::Bicycle {
            let time = slope_speed_length / speed;
            let safety_length = self.bicycle_safety_factor * length;
            let weight = match request.optimize {
                OptimizeType::Safe => safety_length / speed,
                OptimizeType::Greenways => {
                    let weight = safety_length / speed;
                    if self.bicycle_safety_factor <= GREENWAY_SAFETY_FACTOR {
                        weight * GREENWAY_DISCOUNT
                    } else {
                        weight
                    }
                }
                OptimizeType::Flat => length / speed + self.work_cost(),
                OptimizeType::Quick => slope_speed_length / speed,
                OptimizeType::Triangle => {
                    let quick = slope_speed_length * request.triangle_time_factor;
                    let slope = self.work_cost() * request.triangle_slope_factor;
                    let safety = safety_length * request.triangle_safety_factor;
                    (quick + slope + safety) / speed
                }
            };
            return (time, weight);
        }

        if mode == TraverseMode::Walk {
            // rescale from the reference speed the walk costs are given at,
            // this covers walking a bike too
            let cost = walk_cost(length, self.elevation.max_slope()) * WALK_COST_SPEED / speed;
            return (cost, cost);
        }
        let time = length / speed;
        (time, time)
    }
}

impl Edge {
    /// Successor states of `s0` across this edge, empty when it cannot be
    /// traversed. Kiss-and-ride may produce a second state.
    pub fn traverse<'a>(&'a self, s0: &Arc<State<'a>>) -> Vec<Arc<State<'a>>> {
        match &self.kind {
            EdgeKind::Street(street) => traverse_street(self, street, s0),
            EdgeKind::Free => s0.edit(self).make_state().into_iter().collect(),
            EdgeKind::TransitLink => {
                if !s0.options().modes.is_transit() {
                    return Vec::new();
                }
                let mut editor = s0.edit(self);
                editor.increment_time_in_seconds(1);
                editor.increment_weight(1.0);
                editor.make_state().into_iter().collect()
            }
            EdgeKind::Pattern(pattern) => {
                trace!("Pattern edge {} of route {} is not a street", self.id, pattern.route_id);
                Vec::new()
            }
        }
    }
}

fn traverse_street<'a>(
    edge: &'a Edge,
    street: &'a StreetEdge,
    s0: &Arc<State<'a>>,
) -> Vec<Arc<State<'a>>> {
    let request = s0.options();
    let current_mode = s0.non_transit_mode();
    let state = do_traverse(edge, street, s0, request, current_mode).and_then(|e| e.make_state());

    if !request.kiss_and_ride {
        return state.into_iter().collect();
    }

    if request.arrive_by {
        let mut states: Vec<_> = state.into_iter().collect();
        // branch to the unparked car as soon as transit has been used, even
        // where walking is not allowed
        if s0.is_car_parked() && s0.is_ever_boarded() && current_mode == TraverseMode::Walk {
            let fork = do_traverse(edge, street, s0, request, TraverseMode::Car).and_then(|mut e| {
                e.set_car_parked(false);
                e.make_state()
            });
            states.extend(fork);
        }
        states
    } else {
        // being dropped off is irrevocable, the walk check stops recursion
        if !s0.is_car_parked() && !street.permission.car && current_mode == TraverseMode::Car {
            return do_traverse(edge, street, s0, request, TraverseMode::Walk)
                .and_then(|mut e| {
                    e.set_car_parked(true);
                    e.make_state()
                })
                .into_iter()
                .collect();
        }
        state.into_iter().collect()
    }
}

fn do_traverse<'a>(
    edge: &'a Edge,
    street: &'a StreetEdge,
    s0: &Arc<State<'a>>,
    request: &'a RoutingRequest,
    mode: TraverseMode,
) -> Option<StateEditor<'a>> {
    let ctx = s0.context();
    let back_edge = s0.back_edge();
    let back_mode = s0.back_mode();

    if let Some(back) = back_edge {
        if back.is_reverse_of(edge) || edge.is_reverse_of(back) {
            trace!("No U-turn from {} onto {}", back.id, edge.id);
            return None;
        }
    }

    let back_walking_bike = s0.is_back_walking_bike() && back_mode == Some(TraverseMode::Walk);
    let walking_bike = request.walking_bike && mode == TraverseMode::Walk;

    if !street.can_traverse_mode(request, mode) {
        if mode == TraverseMode::Bicycle {
            return do_traverse(edge, street, s0, ctx.bike_walking_request(), TraverseMode::Walk);
        }
        return None;
    }

    let Some(speed) = street.calculate_speed(request, mode) else {
        trace!("{mode} has no street speed");
        return None;
    };
    let (mut time, mut weight) = street.base_cost(request, mode, speed);
    if street.stairs {
        weight *= request.stairs_reluctance;
    } else {
        weight *= request.walk_reluctance;
    }

    let mut editor = s0.edit(edge);
    editor.set_back_mode(mode);
    editor.set_back_walking_bike(walking_bike);

    if let Some((back, back_street)) = back_edge.and_then(|b| b.street().map(|s| (b, s))) {
        let back_mode = back_mode.unwrap_or(mode);
        let back_request = if back_walking_bike {
            ctx.bike_walking_request()
        } else {
            ctx.request()
        };
        let back_speed = back_street
            .calculate_speed(back_request, back_mode)
            .unwrap_or(speed);

        let turn_cost = if request.arrive_by {
            if !street.can_turn_onto(back, s0.time(), back_mode) {
                debug!("Turn from {} onto {} is restricted", edge.id, back.id);
                return None;
            }
            match ctx.vertex(edge.to).filter(|v| v.is_intersection()) {
                Some(vertex) => ctx.cost_model().compute_traversal_cost(
                    vertex,
                    street,
                    back_street,
                    back_mode,
                    back_request,
                    speed,
                    back_speed,
                ),
                None => {
                    debug!("No intersection at the end of {}, no turn cost", edge.id);
                    0.0
                }
            }
        } else {
            if !back_street.can_turn_onto(edge, s0.time(), mode) {
                debug!("Turn from {} onto {} is restricted", back.id, edge.id);
                return None;
            }
            match ctx.vertex(edge.from).filter(|v| v.is_intersection()) {
                Some(vertex) => ctx.cost_model().compute_traversal_cost(
                    vertex,
                    back_street,
                    street,
                    mode,
                    request,
                    back_speed,
                    speed,
                ),
                None => {
                    debug!("No intersection at the start of {}, no turn cost", edge.id);
                    0.0
                }
            }
        };

        if !mode.is_driving() {
            editor.increment_walk_distance(turn_cost / TURN_COST_PER_WALK_METER);
        }
        time += turn_cost.ceil();
        weight += request.turn_reluctance * turn_cost;
    }

    let switching_to_bike = walking_bike || mode == TraverseMode::Bicycle;
    let was_on_bike = back_walking_bike || back_mode == Some(TraverseMode::Bicycle);
    if switching_to_bike && !was_on_bike {
        editor.increment_time_in_seconds(request.bike_switch_time);
        editor.increment_weight(request.bike_switch_cost);
    }

    if !mode.is_driving() {
        editor.increment_walk_distance(street.length);
    }

    let rounded_time = time.ceil() as Time;

    if request.kiss_and_ride || request.park_and_ride {
        let counts = if request.arrive_by {
            !s0.is_car_parked()
        } else {
            !s0.is_ever_boarded()
        };
        if counts {
            editor.increment_pre_transit_time(rounded_time);
        }
        if editor.is_max_pre_transit_time_exceeded(request) {
            if !request.soft_pre_transit_limiting {
                debug!("Pre-transit time limit reached on {}", edge.id);
                return None;
            }
            weight += overage_penalty(
                s0.pre_transit_time() as f64,
                editor.pre_transit_time() as f64,
                request.max_pre_transit_time as f64,
                request.pre_transit_penalty,
                request.pre_transit_overage_rate,
            );
        }
    }

    if editor.we_have_walked_too_far(request) {
        if !request.soft_walk_limiting {
            debug!("Too much walking on {}", edge.id);
            return None;
        }
        weight += overage_penalty(
            s0.walk_distance(),
            editor.walk_distance(),
            request.max_walk_distance,
            request.soft_walk_penalty,
            request.soft_walk_overage_rate,
        );
    }

    editor.increment_time_in_seconds(rounded_time);
    editor.increment_weight(weight);
    Some(editor)
}
