//! Point-to-line projection and line splitting.
//!
//! Projection works in a local plate-carrée frame where longitudes are
//! scaled by `cos(lat)` of the query point, so distances come out in
//! degrees of latitude.

use geo::{
    Coord, Distance, Euclidean, LineInterpolatePoint, LineLocatePoint, LineString, MapCoords, Point,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineProjection {
    /// Index of the segment `(coords[segment], coords[segment + 1])`
    pub segment: usize,
    /// Position along that segment in `[0, 1]`
    pub fraction: f64,
    /// Nearest point on the line
    pub point: Coord<f64>,
    /// Scaled distance from the query point to `point`, in degrees
    pub distance: f64,
}

impl LineProjection {
    /// True when the nearest point is the first or last coordinate
    pub fn is_endpoint(&self, line: &LineString<f64>) -> bool {
        let last_segment = line.0.len().saturating_sub(2);
        (self.segment == 0 && self.fraction <= 0.0)
            || (self.segment == last_segment && self.fraction >= 1.0)
    }
}

/// Nearest point on `line` to `point`. `None` for lines without a segment.
pub fn project_onto_line(line: &LineString<f64>, point: Coord<f64>) -> Option<LineProjection> {
    let xscale = point.y.to_radians().cos();
    let scale = |c: Coord<f64>| Coord {
        x: c.x * xscale,
        y: c.y,
    };
    let query = Point::from(scale(point));
    let mut best: Option<LineProjection> = None;

    for (segment, part) in line.lines().enumerate() {
        let scaled = part.map_coords(scale);
        let distance = Euclidean.distance(&query, &scaled);
        if best.is_some_and(|b| distance >= b.distance) {
            continue;
        }
        // the fraction is the same in both frames, the scaling is linear
        let fraction = scaled.line_locate_point(&query).unwrap_or(0.0);
        let Some(nearest) = part.line_interpolate_point(fraction) else {
            continue;
        };
        best = Some(LineProjection {
            segment,
            fraction,
            point: nearest.0,
            distance,
        });
    }
    best
}

/// Splits `line` at a projected point into the part before and after it.
/// Both halves keep every original vertex on their side.
pub fn split_line_at(
    line: &LineString<f64>,
    projection: &LineProjection,
) -> (LineString<f64>, LineString<f64>) {
    let coords = &line.0;
    let at = projection.point;

    let mut head: Vec<Coord<f64>> = coords[..=projection.segment].to_vec();
    if head.last() != Some(&at) || head.len() < 2 {
        head.push(at);
    }

    let mut tail = vec![at];
    let rest = &coords[projection.segment + 1..];
    match rest.first() {
        Some(first) if *first == at && rest.len() > 1 => tail.extend_from_slice(&rest[1..]),
        _ => tail.extend_from_slice(rest),
    }

    (LineString::new(head), LineString::new(tail))
}
