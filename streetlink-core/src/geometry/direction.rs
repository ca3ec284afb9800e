//! Azimuths at the ends of street geometries.
//!
//! Angles are radians clockwise from north in `(-PI, PI]`. Short leading or
//! trailing segments (under [`MIN_SEGMENT_METERS`]) are skipped so that a
//! tiny kink at an intersection does not dominate the direction.

use std::f64::consts::PI;

use geo::{Bearing, Coord, Haversine, LineString, Point};

use super::distance::fast_distance;
use crate::Error;

const MIN_SEGMENT_METERS: f64 = 10.0;

/// Azimuth of the start of the line
pub fn first_angle(line: &LineString<f64>) -> Result<f64, Error> {
    let coords = checked_coords(line)?;
    let start = coords[0];
    let mut next = coords[1];
    let mut i = 2;
    while fast_distance(start, next) < MIN_SEGMENT_METERS && i < coords.len() {
        next = coords[i];
        i += 1;
    }
    Ok(azimuth(start, next))
}

/// Azimuth of the end of the line
pub fn last_angle(line: &LineString<f64>) -> Result<f64, Error> {
    let coords = checked_coords(line)?;
    let n = coords.len();
    let end = coords[n - 1];
    let mut prev = coords[n - 2];
    let mut i = n.checked_sub(3);
    while fast_distance(prev, end) < MIN_SEGMENT_METERS {
        match i {
            Some(idx) => {
                prev = coords[idx];
                i = idx.checked_sub(1);
            }
            None => break,
        }
    }
    Ok(azimuth(prev, end))
}

fn checked_coords(line: &LineString<f64>) -> Result<&[Coord<f64>], Error> {
    let coords = line.0.as_slice();
    if coords.len() < 2 {
        return Err(Error::InvalidGeometry(format!(
            "line has {} coordinates, need at least 2",
            coords.len()
        )));
    }
    if let Some(bad) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(Error::InvalidGeometry(format!(
            "non-finite coordinate ({}, {})",
            bad.x, bad.y
        )));
    }
    Ok(coords)
}

/// Initial great-circle bearing from `a` to `b`, folded into `(-PI, PI]`
fn azimuth(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let degrees = Haversine.bearing(Point::from(a), Point::from(b));
    let radians = degrees.to_radians();
    if radians > PI { radians - 2.0 * PI } else { radians }
}
