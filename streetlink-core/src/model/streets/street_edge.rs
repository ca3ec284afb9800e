//! Street segment attributes

use geo::LineString;

use super::elevation::{ElevationProfile, ElevationProfileSegment, slope_costs};
use super::permission::StreetTraversalPermission;
use super::turn_restriction::TurnRestriction;
use crate::geometry::{first_angle, last_angle};
use crate::model::EdgeId;

/// Car speed for edges that were not given one, about 25 mph
pub const DEFAULT_CAR_SPEED: f64 = 11.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreetClass {
    Street,
    Crossing,
    #[default]
    OtherPath,
    OtherPlatform,
    TrainPlatform,
    Link,
}

impl StreetClass {
    pub fn is_platform(self) -> bool {
        matches!(self, StreetClass::OtherPlatform | StreetClass::TrainPlatform)
    }
}

#[derive(Debug, Clone)]
pub struct StreetEdge {
    pub name: String,
    pub geometry: LineString<f64>,
    /// Meters
    pub length: f64,
    pub permission: StreetTraversalPermission,
    /// Meters per second
    pub car_speed: f64,
    pub bicycle_safety_factor: f64,
    pub wheelchair_accessible: bool,
    pub street_class: StreetClass,
    /// Bearing at the start of the geometry, degrees in `[0, 360)`
    pub in_angle: i32,
    /// Bearing at the end of the geometry, degrees in `[0, 360)`
    pub out_angle: i32,
    pub turn_restrictions: Vec<TurnRestriction>,
    pub elevation: ElevationProfileSegment,
    /// Permanent edge this one was split from
    pub parent: Option<EdgeId>,
    /// Reverse of the way as digitized. Vertices are not swapped.
    pub back: bool,
    pub roundabout: bool,
    pub has_bogus_name: bool,
    pub no_thru_traffic: bool,
    pub stairs: bool,
    /// Only computed elevation profiles may be attached
    pub slope_override: bool,
}

impl StreetEdge {
    pub fn new(
        geometry: LineString<f64>,
        name: impl Into<String>,
        length: f64,
        permission: StreetTraversalPermission,
        back: bool,
    ) -> Self {
        let (in_angle, out_angle) = edge_angles(&geometry);
        Self {
            name: name.into(),
            geometry,
            length,
            permission,
            car_speed: DEFAULT_CAR_SPEED,
            bicycle_safety_factor: 1.0,
            wheelchair_accessible: true,
            street_class: StreetClass::default(),
            in_angle,
            out_angle,
            turn_restrictions: Vec::new(),
            elevation: ElevationProfileSegment::flat(),
            parent: None,
            back,
            roundabout: false,
            has_bogus_name: false,
            no_thru_traffic: false,
            stairs: false,
            slope_override: false,
        }
    }

    #[must_use]
    pub fn with_car_speed(mut self, car_speed: f64) -> Self {
        self.car_speed = car_speed;
        self
    }

    #[must_use]
    pub fn with_street_class(mut self, street_class: StreetClass) -> Self {
        self.street_class = street_class;
        self
    }

    pub fn add_turn_restriction(&mut self, restriction: TurnRestriction) {
        self.turn_restrictions.push(restriction);
    }

    pub fn has_explicit_turn_restrictions(&self) -> bool {
        !self.turn_restrictions.is_empty()
    }

    /// Attaches an elevation profile and folds its slope costs into the
    /// bicycle safety factor. Returns true if the profile was flattened.
    pub fn set_elevation_profile(&mut self, profile: ElevationProfile, computed: bool) -> bool {
        if profile.len() < 2 || (self.slope_override && !computed) {
            return false;
        }
        let costs = slope_costs(&profile, self.permission.car);
        self.elevation = ElevationProfileSegment::new(costs, profile);
        self.bicycle_safety_factor *= costs.length_multiplier;
        if self.length > 0.0 {
            self.bicycle_safety_factor += costs.slope_safety_cost / self.length;
        }
        costs.flattened
    }

    pub fn slope_speed_effective_length(&self) -> f64 {
        self.elevation.slope_speed_factor() * self.length
    }

    pub fn work_cost(&self) -> f64 {
        self.elevation.slope_work_factor() * self.length
    }

    /// A piece of this edge covering `[start, end]` meters of it, with
    /// geometry `geometry`. Attributes are copied and the elevation profile
    /// cut to the same span. Turn restrictions are only kept when asked for,
    /// since they belong to the end of the edge.
    pub(crate) fn partial(
        &self,
        geometry: LineString<f64>,
        start: f64,
        end: f64,
        parent: EdgeId,
        keep_turn_restrictions: bool,
    ) -> Self {
        let mut partial = StreetEdge::new(
            geometry,
            self.name.clone(),
            end - start,
            self.permission,
            self.back,
        );
        partial.car_speed = self.car_speed;
        partial.bicycle_safety_factor = self.bicycle_safety_factor;
        partial.wheelchair_accessible = self.wheelchair_accessible;
        partial.street_class = self.street_class;
        partial.roundabout = self.roundabout;
        partial.has_bogus_name = self.has_bogus_name;
        partial.no_thru_traffic = self.no_thru_traffic;
        partial.stairs = self.stairs;
        partial.slope_override = self.slope_override;
        partial.parent = Some(parent);
        if keep_turn_restrictions {
            partial.turn_restrictions = self.turn_restrictions.clone();
        }
        if let Some(profile) = self.elevation.partial_profile(start, end) {
            let costs = slope_costs(&profile, self.permission.car);
            partial.elevation = ElevationProfileSegment::new(costs, profile);
        }
        partial
    }
}

fn edge_angles(geometry: &LineString<f64>) -> (i32, i32) {
    match (first_angle(geometry), last_angle(geometry)) {
        (Ok(first), Ok(last)) => (to_compass_degrees(first), to_compass_degrees(last)),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Could not determine street edge angles, setting to zero: {e}");
            (0, 0)
        }
    }
}

fn to_compass_degrees(radians: f64) -> i32 {
    ((radians.to_degrees() as i32) + 180) % 360
}
