use geo::{Coord, Rect};

/// Envelope operations with closed-boundary semantics.
///
/// `geo`'s `Contains` excludes the boundary, while index queries need a
/// point on the edge of an envelope to count as inside.
pub trait EnvelopeExt {
    /// Degenerate envelope around a single coordinate
    fn around(coord: Coord<f64>) -> Self;
    /// Grow by `dx` on both sides in x and `dy` on both sides in y
    fn expand_by(&self, dx: f64, dy: f64) -> Self;
    fn covers(&self, coord: Coord<f64>) -> bool;
    fn overlaps(&self, other: &Self) -> bool;
}

impl EnvelopeExt for Rect<f64> {
    fn around(coord: Coord<f64>) -> Self {
        Rect::new(coord, coord)
    }

    fn expand_by(&self, dx: f64, dy: f64) -> Self {
        let min = self.min();
        let max = self.max();
        Rect::new(
            Coord {
                x: min.x - dx,
                y: min.y - dy,
            },
            Coord {
                x: max.x + dx,
                y: max.y + dy,
            },
        )
    }

    fn covers(&self, coord: Coord<f64>) -> bool {
        let min = self.min();
        let max = self.max();
        coord.x >= min.x && coord.x <= max.x && coord.y >= min.y && coord.y <= max.y
    }

    fn overlaps(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }
}
