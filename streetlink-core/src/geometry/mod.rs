//! Coordinate math shared by the index, the linker and the traversal model.
//!
//! All coordinates are `geo::Coord<f64>` with `x` = longitude and
//! `y` = latitude in degrees.

pub mod direction;
pub mod distance;
pub mod envelope;
pub mod split;

pub use direction::{first_angle, last_angle};
pub use distance::{
    RADIUS_OF_EARTH_M, degrees_to_meters, distance, fast_distance, line_length, meters_to_degrees,
    meters_to_lon_degrees,
};
pub use envelope::EnvelopeExt;
pub use split::{LineProjection, project_onto_line, split_line_at};
