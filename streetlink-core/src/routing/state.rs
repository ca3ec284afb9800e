//! Path search states and the editor that derives successors from them

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::{Distance, Time};
use crate::model::{Edge, TraverseMode, VertexId};
use crate::routing::{RoutingContext, RoutingRequest};

/// One step of a search path. Immutable once made; successors are built with
/// [`State::edit`] and [`StateEditor::make_state`].
#[derive(Clone)]
pub struct State<'a> {
    ctx: &'a RoutingContext<'a>,
    vertex: VertexId,
    back_state: Option<Arc<State<'a>>>,
    back_edge: Option<&'a Edge>,
    time: Time,
    weight: f64,
    walk_distance: Distance,
    pre_transit_time: Time,
    non_transit_mode: TraverseMode,
    back_mode: Option<TraverseMode>,
    back_walking_bike: bool,
    car_parked: bool,
    ever_boarded: bool,
    num_boardings: u32,
}

impl<'a> State<'a> {
    /// Initial state of a search at `vertex`, at the request time.
    ///
    /// With park-and-ride or kiss-and-ride an arrive-by search starts with
    /// the car parked (walking), a depart-after search in the car.
    pub fn new(vertex: VertexId, ctx: &'a RoutingContext<'a>) -> Arc<Self> {
        let request = ctx.request();
        let (car_parked, non_transit_mode) = if request.park_and_ride || request.kiss_and_ride {
            let parked = request.arrive_by;
            let mode = if parked {
                TraverseMode::Walk
            } else {
                TraverseMode::Car
            };
            (parked, mode)
        } else if request.modes.car() {
            (false, TraverseMode::Car)
        } else if request.modes.bicycle() {
            (false, TraverseMode::Bicycle)
        } else {
            (false, TraverseMode::Walk)
        };

        Arc::new(Self {
            ctx,
            vertex,
            back_state: None,
            back_edge: None,
            time: request.time,
            weight: 0.0,
            walk_distance: 0.0,
            pre_transit_time: 0,
            non_transit_mode,
            back_mode: None,
            back_walking_bike: false,
            car_parked,
            ever_boarded: false,
            num_boardings: 0,
        })
    }

    /// Editor for the state reached by traversing `edge` from this one
    pub fn edit(self: &Arc<Self>, edge: &'a Edge) -> StateEditor<'a> {
        let vertex = if self.ctx.request().arrive_by {
            edge.from
        } else {
            edge.to
        };
        let mut next = State::clone(self);
        next.vertex = vertex;
        next.back_state = Some(Arc::clone(self));
        next.back_edge = Some(edge);
        StateEditor {
            state: next,
            defective: false,
        }
    }

    pub fn context(&self) -> &'a RoutingContext<'a> {
        self.ctx
    }

    pub fn options(&self) -> &'a RoutingRequest {
        self.ctx.request()
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    pub fn back_state(&self) -> Option<&Arc<State<'a>>> {
        self.back_state.as_ref()
    }

    pub fn back_edge(&self) -> Option<&'a Edge> {
        self.back_edge
    }

    /// Epoch seconds
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn elapsed_time_seconds(&self) -> Time {
        (self.time - self.ctx.request().time).abs()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn walk_distance(&self) -> Distance {
        self.walk_distance
    }

    pub fn pre_transit_time(&self) -> Time {
        self.pre_transit_time
    }

    pub fn non_transit_mode(&self) -> TraverseMode {
        self.non_transit_mode
    }

    pub fn back_mode(&self) -> Option<TraverseMode> {
        self.back_mode
    }

    pub fn is_back_walking_bike(&self) -> bool {
        self.back_walking_bike
    }

    pub fn is_car_parked(&self) -> bool {
        self.car_parked
    }

    pub fn is_ever_boarded(&self) -> bool {
        self.ever_boarded
    }

    pub fn num_boardings(&self) -> u32 {
        self.num_boardings
    }
}

impl fmt::Debug for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("vertex", &self.vertex)
            .field("back_edge", &self.back_edge.map(|e| e.id))
            .field("time", &self.time)
            .field("weight", &self.weight)
            .field("walk_distance", &self.walk_distance)
            .field("pre_transit_time", &self.pre_transit_time)
            .field("non_transit_mode", &self.non_transit_mode)
            .field("back_mode", &self.back_mode)
            .field("back_walking_bike", &self.back_walking_bike)
            .field("car_parked", &self.car_parked)
            .field("ever_boarded", &self.ever_boarded)
            .finish_non_exhaustive()
    }
}

/// Mutable successor under construction.
///
/// Increments that would make the state meaningless (time running
/// backwards, a NaN or negative weight) mark the editor defective instead
/// of failing, and [`StateEditor::make_state`] then yields nothing.
#[derive(Debug)]
pub struct StateEditor<'a> {
    state: State<'a>,
    defective: bool,
}

impl<'a> StateEditor<'a> {
    /// Moves the clock forward, or backward for arrive-by searches
    pub fn increment_time_in_seconds(&mut self, seconds: Time) {
        if seconds < 0 {
            warn!("A state's time is being incremented by a negative amount while traversing edge {:?}", self.edge_id());
            self.defective = true;
            return;
        }
        if self.state.ctx.request().arrive_by {
            self.state.time -= seconds;
        } else {
            self.state.time += seconds;
        }
    }

    pub fn increment_weight(&mut self, weight: f64) {
        if !weight.is_finite() || weight < 0.0 {
            warn!("A state's weight is being incremented by {weight} while traversing edge {:?}", self.edge_id());
            self.defective = true;
            return;
        }
        self.state.weight += weight;
    }

    pub fn increment_walk_distance(&mut self, length: Distance) {
        if length < 0.0 {
            warn!("A state's walk distance is being incremented by a negative amount");
            self.defective = true;
            return;
        }
        self.state.walk_distance += length;
    }

    pub fn increment_pre_transit_time(&mut self, seconds: Time) {
        if seconds < 0 {
            warn!("A state's pre-transit time is being incremented by a negative amount");
            self.defective = true;
            return;
        }
        self.state.pre_transit_time += seconds;
    }

    pub fn set_back_mode(&mut self, mode: TraverseMode) {
        self.state.back_mode = Some(mode);
    }

    pub fn set_back_walking_bike(&mut self, walking_bike: bool) {
        self.state.back_walking_bike = walking_bike;
    }

    /// Parking switches to walking, unparking back to the car
    pub fn set_car_parked(&mut self, parked: bool) {
        self.state.car_parked = parked;
        self.state.non_transit_mode = if parked {
            TraverseMode::Walk
        } else {
            TraverseMode::Car
        };
    }

    pub fn set_ever_boarded(&mut self, ever_boarded: bool) {
        self.state.ever_boarded = ever_boarded;
    }

    pub fn increment_num_boardings(&mut self) {
        self.state.num_boardings += 1;
    }

    pub fn pre_transit_time(&self) -> Time {
        self.state.pre_transit_time
    }

    pub fn walk_distance(&self) -> Distance {
        self.state.walk_distance
    }

    pub fn is_max_pre_transit_time_exceeded(&self, request: &RoutingRequest) -> bool {
        self.state.pre_transit_time > request.max_pre_transit_time
    }

    pub fn we_have_walked_too_far(&self, request: &RoutingRequest) -> bool {
        self.state.walk_distance > request.max_walk_distance
    }

    /// The finished state, or `None` if an increment was rejected
    pub fn make_state(self) -> Option<Arc<State<'a>>> {
        if self.defective {
            warn!(
                "Discarding defective state at {:?} reached over edge {:?}",
                self.state.vertex,
                self.edge_id()
            );
            return None;
        }
        Some(Arc::new(self.state))
    }

    fn edge_id(&self) -> Option<crate::EdgeId> {
        self.state.back_edge.map(|e| e.id)
    }
}
