use serde::{Deserialize, Serialize};

use crate::Error;

/// Spatial index back end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Bulk-loaded R-tree
    RTree,
    /// Fixed-size cells keyed by their integer coordinates
    #[default]
    HashGrid,
}

/// Settings for [`crate::StreetVertexIndex`]. Angular values are plate-carrée
/// degrees, where 0.001 is about 100 m at the equator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreetIndexConfig {
    pub kind: IndexKind,
    /// Hash grid cell edge in degrees
    pub grid_cell_size: f64,
    /// Envelope growth per closest-edge search iteration, degrees
    pub search_step: f64,
    /// Streets further than this are never found, degrees
    pub max_search_radius: f64,
    /// A point this close to an intersection is treated as on it, meters
    pub corner_distance: f64,
    /// Radius for transit stop lookups during resolution, meters
    pub stop_search_radius: f64,
    /// A stop is linked to a new street location when its distance over the
    /// street distance is below this
    pub stop_distance_ratio: f64,
}

impl Default for StreetIndexConfig {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            grid_cell_size: 0.005,
            search_step: 0.001,
            max_search_radius: 0.01,
            corner_distance: 10.0,
            stop_search_radius: 1000.0,
            stop_distance_ratio: 1.5,
        }
    }
}

impl StreetIndexConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("grid_cell_size", self.grid_cell_size),
            ("search_step", self.search_step),
            ("max_search_radius", self.max_search_radius),
            ("corner_distance", self.corner_distance),
            ("stop_search_radius", self.stop_search_radius),
            ("stop_distance_ratio", self.stop_distance_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.search_step > self.max_search_radius {
            return Err(Error::InvalidConfig(format!(
                "search_step {} exceeds max_search_radius {}",
                self.search_step, self.max_search_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StreetIndexConfig = serde_json::from_str(r#"{"kind": "r_tree"}"#).unwrap();
        assert_eq!(config.kind, IndexKind::RTree);
        assert_eq!(config.search_step, 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_step_larger_than_radius_is_rejected() {
        let config = StreetIndexConfig {
            search_step: 0.1,
            ..StreetIndexConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
