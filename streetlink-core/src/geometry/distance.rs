//! Spherical distance library

use std::f64::consts::PI;

use geo::line_measures::LengthMeasurable;
use geo::{Coord, Distance, Haversine, LineString, Point};

/// Mean earth radius in meters used for degree conversions
pub const RADIUS_OF_EARTH_M: f64 = 6_371_010.0;

/// Great-circle distance in meters
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Great-circle length of a line in meters
pub fn line_length(line: &LineString<f64>) -> f64 {
    line.length(&Haversine)
}

/// Equirectangular approximation of [`distance`], good to well under a
/// percent over the few hundred meters it is used for.
pub fn fast_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians() * ((a.y + b.y) / 2.0).to_radians().cos();
    RADIUS_OF_EARTH_M * d_lat.hypot(d_lon)
}

/// Meters to degrees of latitude
pub fn meters_to_degrees(meters: f64) -> f64 {
    360.0 * meters / (2.0 * PI * RADIUS_OF_EARTH_M)
}

/// Degrees (of latitude) to meters
pub fn degrees_to_meters(degrees: f64) -> f64 {
    degrees * 2.0 * PI * RADIUS_OF_EARTH_M / 360.0
}

/// Meters to degrees of longitude at the given latitude.
///
/// Uses the latitude furthest from the equator within the span so that an
/// envelope built from the result never undershoots the radius.
pub fn meters_to_lon_degrees(meters: f64, lat: f64) -> f64 {
    let d_lat = meters_to_degrees(meters);
    let extreme_lat = (lat.abs() + d_lat).min(89.9);
    d_lat / extreme_lat.to_radians().cos()
}
