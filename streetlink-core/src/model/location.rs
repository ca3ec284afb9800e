use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// A place a trip starts or ends at, as given by the caller.
///
/// Either a coordinate (optionally with a display name) or a `place` string
/// naming a vertex label directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericLocation {
    pub name: Option<String>,
    pub place: Option<String>,
    pub coordinate: Option<Coord<f64>>,
}

impl GenericLocation {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            coordinate: Some(Coord { x: lon, y: lat }),
            ..Self::default()
        }
    }

    pub fn from_place(place: impl Into<String>) -> Self {
        Self {
            place: Some(place.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

impl fmt::Display for GenericLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.coordinate, &self.place) {
            (Some(c), _) => write!(f, "{},{}", c.y, c.x),
            (None, Some(place)) => f.write_str(place),
            (None, None) => f.write_str(self.name.as_deref().unwrap_or("")),
        }
    }
}
