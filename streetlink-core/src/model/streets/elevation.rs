//! Elevation profiles and the slope costs derived from them.
//!
//! A profile is a list of `(distance along edge, elevation)` pairs in
//! meters, stored as `Coord { x: distance, y: elevation }`.

use geo::Coord;

/// Edges with car access steeper than this are assumed to be bad data
const MAX_CAR_SLOPE: f64 = 0.35;

/// Extra seconds per meter climbed when walking (Naismith's rule)
const WALK_CLIMB_SECONDS_PER_METER: f64 = 6.0;
/// Langmuir correction for steep slopes, seconds per meter of rise
const WALK_STEEP_SECONDS_PER_METER: f64 = 2.0;
/// tan(12 degrees)
const WALK_STEEP_SLOPE: f64 = 0.2126;
/// Reference walking speed the walk costs are expressed in
pub const WALK_COST_SPEED: f64 = 4.0 / 3.0;

/// Cycling slows down by this fraction per unit of uphill grade
const BIKE_UPHILL_SLOWDOWN: f64 = 8.0;
/// Cycling speeds up by this fraction per unit of downhill grade
const BIKE_DOWNHILL_SPEEDUP: f64 = 4.0;
const BIKE_MIN_SPEED_FACTOR: f64 = 0.6;
/// Meters of flat riding that cost as much work as one meter of climbing
const BIKE_WORK_PER_METER_CLIMBED: f64 = 10.0;
/// Grades above this add to the bicycle safety cost
const BIKE_SAFE_SLOPE: f64 = 0.06;
const BIKE_SLOPE_SAFETY_WEIGHT: f64 = 10.0;

pub type ElevationProfile = Vec<Coord<f64>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeCosts {
    pub slope_speed_factor: f64,
    pub slope_work_factor: f64,
    pub max_slope: f64,
    /// 3D length over 2D length
    pub length_multiplier: f64,
    /// Extra bicycle safety cost in meter-equivalents
    pub slope_safety_cost: f64,
    /// Profile was rejected as implausible and the edge treated as flat
    pub flattened: bool,
}

impl SlopeCosts {
    pub fn flat() -> Self {
        Self {
            slope_speed_factor: 1.0,
            slope_work_factor: 1.0,
            max_slope: 0.0,
            length_multiplier: 1.0,
            slope_safety_cost: 0.0,
            flattened: false,
        }
    }
}

/// Derives slope costs from a profile.
///
/// `slope_limit` marks car-accessible streets, whose profile is discarded
/// when the steepest grade exceeds what a road can have.
pub fn slope_costs(profile: &[Coord<f64>], slope_limit: bool) -> SlopeCosts {
    let mut run_total = 0.0;
    let mut speed_length = 0.0;
    let mut work_length = 0.0;
    let mut length_3d = 0.0;
    let mut safety_cost = 0.0;
    let mut max_slope: f64 = 0.0;

    for pair in profile.windows(2) {
        let run = pair[1].x - pair[0].x;
        if run <= 0.0 {
            continue;
        }
        let rise = pair[1].y - pair[0].y;
        let slope = rise / run;
        max_slope = max_slope.max(slope.abs());

        let speed_factor = if slope > 0.0 {
            1.0 + BIKE_UPHILL_SLOWDOWN * slope
        } else {
            (1.0 + BIKE_DOWNHILL_SPEEDUP * slope).max(BIKE_MIN_SPEED_FACTOR)
        };
        run_total += run;
        speed_length += run * speed_factor;
        work_length += run + rise.max(0.0) * BIKE_WORK_PER_METER_CLIMBED;
        length_3d += run.hypot(rise);
        if slope.abs() > BIKE_SAFE_SLOPE {
            safety_cost += run * (slope.abs() - BIKE_SAFE_SLOPE) * BIKE_SLOPE_SAFETY_WEIGHT;
        }
    }

    if run_total <= 0.0 {
        return SlopeCosts::flat();
    }
    if slope_limit && max_slope > MAX_CAR_SLOPE {
        log::debug!("Flattening elevation profile with max slope {max_slope:.3}");
        return SlopeCosts {
            flattened: true,
            ..SlopeCosts::flat()
        };
    }

    SlopeCosts {
        slope_speed_factor: speed_length / run_total,
        slope_work_factor: work_length / run_total,
        max_slope,
        length_multiplier: length_3d / run_total,
        slope_safety_cost: safety_cost,
        flattened: false,
    }
}

/// Walking time in seconds at [`WALK_COST_SPEED`] for an edge of the given
/// length and maximum slope. The slope is unsigned, so every edge is costed
/// as the climb.
pub fn walk_cost(length: f64, max_slope: f64) -> f64 {
    let flat = length / WALK_COST_SPEED;
    if max_slope <= 0.0 {
        return flat;
    }
    let rise = length * max_slope;
    let mut cost = flat + rise * WALK_CLIMB_SECONDS_PER_METER;
    if max_slope > WALK_STEEP_SLOPE {
        cost += rise * WALK_STEEP_SECONDS_PER_METER;
    }
    cost
}

/// Elevation data attached to a street edge
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationProfileSegment {
    profile: Option<ElevationProfile>,
    costs: SlopeCosts,
}

impl Default for ElevationProfileSegment {
    fn default() -> Self {
        Self::flat()
    }
}

impl ElevationProfileSegment {
    pub fn flat() -> Self {
        Self {
            profile: None,
            costs: SlopeCosts::flat(),
        }
    }

    pub fn new(costs: SlopeCosts, profile: ElevationProfile) -> Self {
        Self {
            profile: Some(profile),
            costs,
        }
    }

    pub fn profile(&self) -> Option<&[Coord<f64>]> {
        self.profile.as_deref()
    }

    pub fn costs(&self) -> &SlopeCosts {
        &self.costs
    }

    pub fn slope_speed_factor(&self) -> f64 {
        self.costs.slope_speed_factor
    }

    pub fn slope_work_factor(&self) -> f64 {
        self.costs.slope_work_factor
    }

    pub fn max_slope(&self) -> f64 {
        self.costs.max_slope
    }

    pub fn is_flattened(&self) -> bool {
        self.costs.flattened
    }

    /// The part of the profile between `start` and `end` meters, rebased so
    /// that it starts at zero. Interpolates elevations at the cut points.
    pub fn partial_profile(&self, start: f64, end: f64) -> Option<ElevationProfile> {
        let profile = self.profile.as_deref()?;
        let mut out = Vec::new();
        for pair in profile.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.x < start || a.x > end || b.x <= a.x {
                continue;
            }
            let lerp = |d: f64| a.y + (b.y - a.y) * (d - a.x) / (b.x - a.x);
            if out.is_empty() {
                let from = a.x.max(start);
                out.push(Coord {
                    x: from - start,
                    y: lerp(from),
                });
            }
            let to = b.x.min(end);
            out.push(Coord {
                x: to - start,
                y: lerp(to),
            });
        }
        (out.len() >= 2).then_some(out)
    }
}
