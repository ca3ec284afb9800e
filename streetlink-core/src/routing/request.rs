//! Per-request routing options

use serde::{Deserialize, Serialize};

use crate::model::{TraverseMode, TraverseModeSet};
use crate::{Distance, Error, Time};

/// How bicycle routes are weighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizeType {
    #[default]
    Quick,
    Safe,
    Flat,
    Greenways,
    /// Blend of quick, flat and safe using the triangle factors
    Triangle,
}

/// Options for a single routing request. Every field has a default, so a
/// JSON document only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRequest {
    pub modes: TraverseModeSet,
    /// Meters per second
    pub walk_speed: f64,
    pub bike_speed: f64,
    /// Upper bound used for car lower bounds. Streets carry their own speed.
    pub car_speed: f64,
    /// Walking speed while pushing a bicycle
    pub bike_walking_speed: f64,
    pub wheelchair_accessible: bool,
    /// Steepest grade a wheelchair user can take
    pub max_slope: f64,
    pub optimize: OptimizeType,
    pub triangle_time_factor: f64,
    pub triangle_slope_factor: f64,
    pub triangle_safety_factor: f64,
    pub walk_reluctance: f64,
    pub stairs_reluctance: f64,
    pub turn_reluctance: f64,
    /// Seconds to get on a bicycle
    pub bike_switch_time: Time,
    pub bike_switch_cost: f64,
    /// Meters
    pub max_walk_distance: Distance,
    pub soft_walk_limiting: bool,
    pub soft_walk_penalty: f64,
    pub soft_walk_overage_rate: f64,
    /// Seconds
    pub max_pre_transit_time: Time,
    pub soft_pre_transit_limiting: bool,
    pub pre_transit_penalty: f64,
    pub pre_transit_overage_rate: f64,
    pub kiss_and_ride: bool,
    pub park_and_ride: bool,
    pub arrive_by: bool,
    /// Set on the derived bike-walking request
    pub walking_bike: bool,
    pub drive_on_right: bool,
    /// Only read by the naming collaborator
    pub locale: String,
    /// Search start (or end, when arriving by) in epoch seconds
    pub time: Time,
}

impl Default for RoutingRequest {
    fn default() -> Self {
        Self {
            modes: TraverseModeSet::walk_and_transit(),
            walk_speed: 1.33,
            bike_speed: 5.0,
            car_speed: 40.0,
            bike_walking_speed: 1.33 * 0.8,
            wheelchair_accessible: false,
            max_slope: 0.0833333333333,
            optimize: OptimizeType::Quick,
            triangle_time_factor: 0.0,
            triangle_slope_factor: 0.0,
            triangle_safety_factor: 0.0,
            walk_reluctance: 2.0,
            stairs_reluctance: 2.0,
            turn_reluctance: 1.0,
            bike_switch_time: 0,
            bike_switch_cost: 0.0,
            max_walk_distance: f64::MAX,
            soft_walk_limiting: true,
            soft_walk_penalty: 60.0,
            soft_walk_overage_rate: 5.0,
            max_pre_transit_time: Time::MAX,
            soft_pre_transit_limiting: true,
            pre_transit_penalty: 300.0,
            pre_transit_overage_rate: 10.0,
            kiss_and_ride: false,
            park_and_ride: false,
            arrive_by: false,
            walking_bike: false,
            drive_on_right: true,
            locale: "en".to_string(),
            time: 0,
        }
    }
}

impl RoutingRequest {
    pub fn new(modes: TraverseModeSet) -> Self {
        Self {
            modes,
            ..Self::default()
        }
    }

    /// Parses and validates a request from JSON
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let speeds = [
            ("walk_speed", self.walk_speed),
            ("bike_speed", self.bike_speed),
            ("car_speed", self.car_speed),
            ("bike_walking_speed", self.bike_walking_speed),
        ];
        for (name, speed) in speeds {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {speed}"
                )));
            }
        }

        let factors = [
            ("walk_reluctance", self.walk_reluctance),
            ("stairs_reluctance", self.stairs_reluctance),
            ("turn_reluctance", self.turn_reluctance),
            ("triangle_time_factor", self.triangle_time_factor),
            ("triangle_slope_factor", self.triangle_slope_factor),
            ("triangle_safety_factor", self.triangle_safety_factor),
            ("bike_switch_cost", self.bike_switch_cost),
            ("soft_walk_penalty", self.soft_walk_penalty),
            ("soft_walk_overage_rate", self.soft_walk_overage_rate),
            ("pre_transit_penalty", self.pre_transit_penalty),
            ("pre_transit_overage_rate", self.pre_transit_overage_rate),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.max_slope.is_nan() || self.max_slope < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_slope must be non-negative, got {}",
                self.max_slope
            )));
        }
        if self.max_walk_distance.is_nan() || self.max_walk_distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_walk_distance must be non-negative, got {}",
                self.max_walk_distance
            )));
        }
        if self.bike_switch_time < 0 || self.max_pre_transit_time < 0 {
            return Err(Error::InvalidConfig(
                "bike_switch_time and max_pre_transit_time must be non-negative".to_string(),
            ));
        }
        if self.modes.is_empty() {
            return Err(Error::InvalidConfig("no travel modes requested".to_string()));
        }
        Ok(())
    }

    /// Street speed of a non-car mode. Transit modes have none.
    pub fn speed(&self, mode: TraverseMode) -> Option<f64> {
        match mode {
            TraverseMode::Walk => Some(self.walk_speed),
            TraverseMode::Bicycle => Some(self.bike_speed),
            TraverseMode::Car => Some(self.car_speed),
            _ => None,
        }
    }

    /// Fastest speed any requested street mode can reach
    pub fn street_speed_upper_bound(&self) -> f64 {
        let mut speed = self.walk_speed;
        if self.modes.bicycle() {
            speed = speed.max(self.bike_speed);
        }
        if self.modes.car() {
            speed = speed.max(self.car_speed);
        }
        speed
    }

    /// Options used while pushing a bicycle
    pub fn bike_walking_options(&self) -> Self {
        let mut modes = self.modes;
        modes.remove(TraverseMode::Bicycle);
        modes.insert(TraverseMode::Walk);
        Self {
            modes,
            walk_speed: self.bike_walking_speed,
            walk_reluctance: self.walk_reluctance * 2.7,
            stairs_reluctance: self.stairs_reluctance * 5.0,
            walking_bike: true,
            bike_switch_time: 0,
            bike_switch_cost: 0.0,
            ..self.clone()
        }
    }
}
